//! Dashboard aggregates over TOFS reports.
//!
//! `GET /api/dashboard` groups the filtered reports by site, status,
//! submitter and CLSR category and builds a monthly trend. The `period`
//! preset cuts either the trend alone or the whole query, depending on
//! `DASHBOARD_PERIOD_SCOPE`.

pub mod dtos;
pub mod handlers;
pub mod period;
pub mod routes;
pub mod services;

pub use period::PeriodScope;
pub use routes::routes;
pub use services::DashboardService;
