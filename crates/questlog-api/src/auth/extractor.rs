//! Axum용 JWT 인증 추출기.
//!
//! 보호된 라우트는 저장소 호출 전에 토큰 검증이 먼저 수행됩니다.
//! 역할 검사는 요구 역할과의 동등 비교입니다 — 상하 관계가
//! 없으므로 admin이 user 전용 라우트를 호출해도 거부됩니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use questlog_core::UserRole;

use super::{decode_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// JWT 인증 추출기.
///
/// Authorization 헤더의 Bearer 토큰을 검증하고 Claims를 추출합니다.
/// 토큰 누락/형식 오류/만료/위조는 모두 401로 거부됩니다.
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        // 서명 키는 시작 시 로드된 설정에서 주입됨
        let token_data = decode_token(token, &state.settings.auth.jwt_secret)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(JwtAuth(token_data.claims))
    }
}

/// 역할 동등성 검사.
///
/// 요구 역할과 토큰의 역할이 정확히 같을 때만 통과합니다.
/// (계층 없음 — 어느 방향의 불일치든 Forbidden)
pub fn require_role(required_role: UserRole, claims: &Claims) -> Result<(), ApiError> {
    if claims.role == required_role {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Admin 역할을 요구하는 추출기.
///
/// 사용자 관리 라우트에서 사용합니다.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(UserRole::Admin, &claims)?;
        Ok(AdminAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_exact_match_only() {
        let admin_claims = Claims::new("admin", UserRole::Admin, 60);
        let user_claims = Claims::new("alice", UserRole::User, 60);
        let guest_claims = Claims::new("visitor", UserRole::Guest, 60);

        // 동등한 역할만 통과
        assert!(require_role(UserRole::Admin, &admin_claims).is_ok());
        assert!(require_role(UserRole::User, &user_claims).is_ok());
        assert!(require_role(UserRole::Guest, &guest_claims).is_ok());

        // user 토큰으로 admin 라우트 접근 불가
        assert!(require_role(UserRole::Admin, &user_claims).is_err());

        // admin 토큰으로 user 전용 라우트 접근도 불가 (계층 없음)
        assert!(require_role(UserRole::User, &admin_claims).is_err());
        assert!(require_role(UserRole::Guest, &admin_claims).is_err());
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let user_claims = Claims::new("alice", UserRole::User, 60);
        let err = require_role(UserRole::Admin, &user_claims).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
