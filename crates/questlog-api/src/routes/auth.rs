//! 인증 API 라우트
//!
//! 로그인 및 토큰 발급을 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/login` - 로그인 (토큰 발급)

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{AuthService, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// 로그인 요청 (form-urlencoded).
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login - 로그인
///
/// 자격증명을 검증하고 JWT Access Token을 발급합니다.
/// 어느 요소가 틀렸는지는 응답에서 구분되지 않습니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "잘못된 자격증명"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(request): Form<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = AuthService::login(
        &state.db_pool,
        &state.settings.auth,
        &request.username,
        &request.password,
    )
    .await?;

    Ok(Json(response))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::error::{ApiError, ApiErrorResponse};

    #[test]
    fn test_login_request_form_shape() {
        let request: LoginRequest =
            serde_urlencoded::from_str("username=alice&password=secret").unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret");
    }

    /// 자격증명 불일치는 400과 INVALID_CREDENTIALS 코드로 응답합니다.
    #[tokio::test]
    async fn test_login_rejection_maps_to_400() {
        // 조회 실패/비밀번호 불일치 분기와 동일한 에러를 반환하는 핸들러
        async fn reject(Form(_request): Form<LoginRequest>) -> ApiResult<Json<LoginResponse>> {
            Err(ApiError::InvalidCredentials)
        }

        let app = Router::new().route("/login", post(reject));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=alice&password=wrong"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "INVALID_CREDENTIALS");
    }
}
