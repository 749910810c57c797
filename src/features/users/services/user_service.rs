use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::config::BootstrapAdminConfig;
use crate::core::database::map_db_error;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password::hash_password;
use crate::features::users::dtos::{
    CreateUserDto, UpdateProfileDto, UpdateUserDto, UserQueryParams, UserResponseDto,
};
use crate::features::users::models::{CreateUser, UpdateUser, User, UserRole, UserWithReportCount};
use crate::shared::search::{contains_pattern, non_blank};
use crate::shared::types::PaginationQuery;

const MIN_PASSWORD_LEN: usize = 8;

const USER_COLUMNS: &str =
    "id, full_name, username, email, password_hash, role, work_location, created_at, updated_at";

/// Hash a replacement password, `None` when the field was left empty
fn replacement_password_hash(password: Option<&str>) -> Result<Option<String>> {
    match password.filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))),
        Some(p) => hash_password(p).map(Some),
    }
}

/// Push the user search predicate; no-op for a blank term
fn push_search(qb: &mut QueryBuilder<'_, Postgres>, q: Option<&str>) {
    if let Some(term) = non_blank(q) {
        let pattern = contains_pattern(term);
        qb.push(" WHERE (u.full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR u.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR u.email ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Service for user accounts
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Insert a user; the password must already be hashed
    pub async fn insert(&self, data: CreateUser) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (full_name, username, email, password_hash, role, work_location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.full_name.trim())
            .bind(&data.username)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(data.role)
            .bind(non_blank(data.work_location.as_deref()))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        tracing::info!("Created user {} with role {}", user.username, user.role);
        Ok(user)
    }

    /// Create a user with an explicit role
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        self.ensure_username_free(&dto.username, None).await?;

        let user = self
            .insert(CreateUser {
                full_name: dto.full_name,
                username: dto.username,
                email: dto.email,
                password_hash: hash_password(&dto.password)?,
                role: dto.role,
                work_location: dto.work_location,
            })
            .await?;

        Ok(user.into())
    }

    /// Users ordered by full name, each with the number of reports they submitted
    pub async fn list(
        &self,
        params: &UserQueryParams,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<UserResponseDto>, i64)> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u");
        push_search(&mut count_qb, params.q.as_deref());

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT u.id, u.full_name, u.username, u.email, u.password_hash, u.role,
                   u.work_location, u.created_at, u.updated_at,
                   COUNT(r.id) AS report_count
            FROM users u
            LEFT JOIN tofs_reports r ON r.user_id = u.id
            "#,
        );
        push_search(&mut qb, params.q.as_deref());
        qb.push(" GROUP BY u.id ORDER BY u.full_name ASC, u.username ASC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<UserWithReportCount> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponseDto> {
        self.get_by_id(id).await.map(Into::into)
    }

    /// Overwrite a user's fields; an empty password keeps the current one
    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> Result<UserResponseDto> {
        self.get_by_id(id).await?;
        self.ensure_username_free(&dto.username, Some(id)).await?;

        let data = UpdateUser {
            password_hash: replacement_password_hash(dto.password.as_deref())?,
            full_name: dto.full_name,
            username: dto.username,
            email: dto.email,
            role: dto.role,
            work_location: dto.work_location,
        };

        let query = format!(
            r#"
            UPDATE users
            SET full_name = $2,
                username = $3,
                email = $4,
                role = $5,
                work_location = $6,
                password_hash = COALESCE($7, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.full_name.trim())
            .bind(&data.username)
            .bind(&data.email)
            .bind(data.role)
            .bind(non_blank(data.work_location.as_deref()))
            .bind(data.password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("Updated user {}", user.username);
        Ok(user.into())
    }

    /// Self-service profile update; username and role stay as they are
    pub async fn update_profile(
        &self,
        caller: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<UserResponseDto> {
        let password_hash = replacement_password_hash(dto.password.as_deref())?;

        let query = format!(
            r#"
            UPDATE users
            SET full_name = $2,
                email = $3,
                work_location = $4,
                password_hash = COALESCE($5, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(caller.user_id)
            .bind(dto.full_name.trim())
            .bind(&dto.email)
            .bind(non_blank(dto.work_location.as_deref()))
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| AppError::NotFound("User account no longer exists".to_string()))?;

        Ok(user.into())
    }

    /// Delete a user. Their reports remain with no submitter.
    pub async fn delete(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if caller.user_id == id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("User {} deleted by {}", id, caller.username);
        Ok(())
    }

    /// Create the configured super admin when no super admin exists yet
    pub async fn ensure_bootstrap_admin(&self, config: &BootstrapAdminConfig) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(UserRole::SuperAdmin)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        if existing > 0 {
            tracing::debug!("Super admin already present, skipping bootstrap");
            return Ok(());
        }

        self.insert(CreateUser {
            full_name: config.full_name.clone(),
            username: config.username.clone(),
            email: config.email.clone(),
            password_hash: hash_password(&config.password)?,
            role: UserRole::SuperAdmin,
            work_location: None,
        })
        .await?;

        tracing::info!("Bootstrapped super admin {}", config.username);
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str, except: Option<Uuid>) -> Result<()> {
        if let Some(existing) = self.find_by_username(username).await? {
            if Some(existing.id) != except {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }
        Ok(())
    }
}
