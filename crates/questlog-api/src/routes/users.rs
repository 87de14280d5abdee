//! 사용자 API 라우트
//!
//! 회원 등록과 사용자 관리를 제공합니다. 등록은 공개이며 나머지
//! 관리는 admin 역할 전용입니다 (역할 동등 비교, 계층 없음).
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/users` - 회원 등록 (공개)
//! - `GET /api/v1/users` - 사용자 목록 (admin)
//! - `GET /api/v1/users/{id}` - 사용자 상세 (admin)
//! - `PUT /api/v1/users/{id}` - 사용자 수정 (admin)
//! - `DELETE /api/v1/users/{id}` - 사용자 삭제 (admin)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use futures::future::try_join_all;
use questlog_core::UserRole;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, AdminAuth};
use crate::error::{ApiError, ApiResult};
use crate::repository::{NewUser, UpdateUser, UserRecord, UserRepository};
use crate::routes::Pagination;
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 회원 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username은 3-50자여야 합니다"))]
    pub username: String,
    #[validate(email(message = "올바른 email 형식이 아닙니다"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,
    /// 요청에 없으면 user
    #[serde(default)]
    pub role: UserRole,
}

/// 사용자 응답 (비밀번호 해시 제외, 캠페인 연관은 ID 목록으로 투영).
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub role: UserRole,
    /// 이 사용자가 생성한 캠페인 ID 목록
    pub created_campaigns: Vec<i32>,
    /// 이 사용자가 게임 마스터인 캠페인 ID 목록
    pub mj_campaigns: Vec<i32>,
    /// 이 사용자가 접근 가능한 캠페인 ID 목록
    pub campaigns: Vec<i32>,
}

impl UserResponse {
    /// 레코드에 캠페인 ID 투영을 붙여 응답 구성.
    async fn load(pool: &sqlx::PgPool, user: UserRecord) -> Result<Self, sqlx::Error> {
        let created_campaigns = UserRepository::created_campaign_ids(pool, user.id).await?;
        let mj_campaigns = UserRepository::mj_campaign_ids(pool, user.id).await?;
        let campaigns = UserRepository::accessible_campaign_ids(pool, user.id).await?;

        Ok(Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            role: user.role,
            created_campaigns,
            mj_campaigns,
            campaigns,
        })
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /api/v1/users - 회원 등록
///
/// username/email이 이미 존재하면 409를 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "등록 완료", body = UserResponse),
        (status = 409, description = "username 또는 email 중복"),
        (status = 422, description = "입력 검증 실패"),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    request.validate()?;

    let hashed_password = hash_password(&request.password)
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let user = UserRepository::create(
        &state.db_pool,
        NewUser {
            username: request.username,
            email: request.email,
            hashed_password,
            is_active: true,
            is_superuser: false,
            role: request.role,
        },
    )
    .await?;

    info!(username = %user.username, "사용자 등록 완료");

    let response = UserResponse::load(&state.db_pool, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/users - 사용자 목록 (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "사용자 목록", body = [UserResponse]),
        (status = 401, description = "토큰 없음/무효"),
        (status = 403, description = "admin 아님"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let (offset, limit) = pagination.clamp();
    let users = UserRepository::list(&state.db_pool, offset, limit).await?;

    let responses = try_join_all(
        users
            .into_iter()
            .map(|u| UserResponse::load(&state.db_pool, u)),
    )
    .await?;

    Ok(Json(responses))
}

/// GET /api/v1/users/{id} - 사용자 상세 (admin)
async fn get_user(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "user", id })?;

    Ok(Json(UserResponse::load(&state.db_pool, user).await?))
}

/// PUT /api/v1/users/{id} - 사용자 부분 수정 (admin)
async fn update_user(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    let existing = UserRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "user", id })?;

    let updated = UserRepository::update(&state.db_pool, &existing, input).await?;

    Ok(Json(UserResponse::load(&state.db_pool, updated).await?))
}

/// DELETE /api/v1/users/{id} - 사용자 삭제 (admin)
///
/// 캠페인의 created_by 또는 mj_id로 참조 중인 사용자는 409를 반환합니다.
async fn delete_user(
    AdminAuth(claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let deleted = match UserRepository::delete(&state.db_pool, id).await {
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            return Err(ApiError::EntityInUse { entity: "user", id });
        }
        other => other?,
    }
    .ok_or(ApiError::NotFound { entity: "user", id })?;

    info!(by = %claims.sub, username = %deleted.username, "사용자 삭제");

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(register).get(list_users))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "longenough".to_string(),
            role: UserRole::User,
        };
        assert!(valid.validate().is_ok());

        let short_name = RegisterRequest {
            username: "ab".to_string(),
            ..valid_clone(&valid)
        };
        assert!(short_name.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid_clone(&valid)
        };
        assert!(short_password.validate().is_err());
    }

    fn valid_clone(r: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            username: r.username.clone(),
            email: r.email.clone(),
            password: r.password.clone(),
            role: r.role,
        }
    }

    #[test]
    fn test_register_request_default_role() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username": "alice", "email": "a@x.com", "password": "longenough"}"#,
        )
        .unwrap();
        assert_eq!(request.role, UserRole::User);
    }
}
