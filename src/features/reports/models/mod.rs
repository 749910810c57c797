mod report;

pub use report::{ClsrCategory, MandatoryBehavior, Report, ReportFields, ReportStatus};
