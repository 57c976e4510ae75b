use actix_web::HttpRequest;
use sqlx::SqlitePool;

use crate::errors::ApiError;
use crate::models::User;

pub const USER_HEADER: &str = "X-User-Id";

/// Authenticated-user gate for every endpoint: the `X-User-Id` header must
/// name a stored user. Session/token mechanics live outside this service.
pub async fn require_user(pool: &SqlitePool, req: &HttpRequest) -> Result<User, ApiError> {
    let id: i64 = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or(ApiError::Unauthorized)?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::Unauthorized)
}
