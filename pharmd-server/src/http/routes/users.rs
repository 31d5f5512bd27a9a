//! User endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
}

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            email: u.email,
            name: u.name,
        }
    }
}

/// POST /api/users - create a new user
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if req.email.is_empty() {
        return Err(ValidationError::Empty { field: "email" }.into());
    }
    if req.name.is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }

    let user = UserRepo::new(&state.pool)
        .create(&req.email, &req.name)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/users/{user_id} - get user by id
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get(&user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_from_record() {
        let user = User {
            user_id: "u1".into(),
            email: "user@test.invalid".into(),
            name: "Test User".into(),
        };
        let resp = UserResponse::from(user);
        assert_eq!(resp.user_id, "u1");
        assert_eq!(resp.email, "user@test.invalid");
    }
}
