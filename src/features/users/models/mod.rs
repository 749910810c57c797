mod user;

pub use user::{CreateUser, UpdateUser, User, UserRole, UserWithReportCount};
