//! 인증 서비스.
//!
//! 자격증명 검증과 토큰 발급을 조합합니다.

use questlog_core::config::AuthSettings;
use questlog_core::UserRole;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use super::{create_token, verify_password, Claims};
use crate::error::ApiError;
use crate::repository::users::{UserRecord, UserRepository};

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// 발급된 JWT Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// 사용자 역할
    pub role: UserRole,
}

/// 인증 서비스.
pub struct AuthService;

impl AuthService {
    /// 자격증명 검증.
    ///
    /// username 조회 후 비밀번호 해시를 비교합니다. 사용자가
    /// 없거나 비밀번호가 틀리면 동일하게 `None`을 반환하여 어느
    /// 요소가 틀렸는지 노출하지 않습니다.
    pub async fn authenticate(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let user = UserRepository::get_by_username(pool, username).await?;

        Ok(user.filter(|u| verify_password(password, &u.hashed_password)))
    }

    /// 로그인 및 토큰 발급.
    ///
    /// 인증에 성공하면 sub=username, role=저장된 역할을 담은 토큰을
    /// 설정된 만료 시간으로 발급합니다.
    pub async fn login(
        pool: &PgPool,
        auth: &AuthSettings,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let user = Self::authenticate(pool, username, password)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let claims = Claims::new(&user.username, user.role, auth.token_expire_minutes);
        let access_token = create_token(&claims, &auth.jwt_secret)
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        tracing::info!(username = %user.username, role = %user.role, "로그인 성공");

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            access_token: "abc.def.ghi".to_string(),
            token_type: "bearer".to_string(),
            role: UserRole::User,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""token_type":"bearer""#));
        assert!(json.contains(r#""role":"user""#));
    }
}
