use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Map constraint violations to client-facing errors, everything else stays a
/// database error
pub fn map_db_error(e: sqlx::Error) -> crate::core::error::AppError {
    use crate::core::error::AppError;

    if let sqlx::Error::Database(db_err) = &e {
        // unique_violation
        if db_err.code().as_deref() == Some("23505") {
            let message = match db_err.constraint() {
                Some("users_username_key") => "Username already taken",
                Some("users_email_key") => "Email already taken",
                Some("tofs_reports_card_number_key") => "Card number already exists",
                _ => "Record already exists",
            };
            return AppError::Conflict(message.to_string());
        }

        // foreign_key_violation
        if db_err.code().as_deref() == Some("23503") {
            return AppError::BadRequest("Referenced record does not exist".to_string());
        }
    }

    tracing::error!("Database error: {:?}", e);
    AppError::Database(e)
}
