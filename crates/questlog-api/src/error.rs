//! 통합 API 에러 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 실패는 요청 단위로 격리되며 프로세스를 종료시키지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 도메인 에러 분류.
///
/// 저장소/서비스 계층에서 발생한 실패를 HTTP 응답으로 1:1 매핑합니다.
/// 재시도는 하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// ID 조회 실패 (모든 엔티티 공통)
    #[error("{entity}을(를) 찾을 수 없습니다: {id}")]
    NotFound { entity: &'static str, id: i32 },

    /// 생성 시 유니크 제약 위반 (username/email)
    #[error("username 또는 email이 이미 사용 중입니다")]
    DuplicateEntity,

    /// 다른 레코드가 참조 중인 엔티티 삭제 시도
    #[error("{entity}이(가) 다른 곳에서 참조되고 있어 삭제할 수 없습니다: {id}")]
    EntityInUse { entity: &'static str, id: i32 },

    /// 로그인 실패 (어느 요소가 틀렸는지 노출하지 않음)
    #[error("잘못된 사용자 이름 또는 비밀번호")]
    InvalidCredentials,

    /// 토큰 누락/만료/위조
    #[error("유효한 인증 토큰이 필요합니다")]
    Unauthorized,

    /// 유효한 토큰이지만 요구 역할과 불일치
    #[error("해당 작업에 대한 권한이 없습니다")]
    Forbidden,

    /// 외부 오브젝트 스토리지 호출 실패
    #[error("외부 스토리지 호출 실패: {0}")]
    Upstream(String),

    /// 요청 본문 검증 실패
    #[error("요청 검증 실패: {0}")]
    Validation(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// 안정적인 에러 코드 반환.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::DuplicateEntity => "DUPLICATE_ENTITY",
            ApiError::EntityInUse { .. } => "ENTITY_IN_USE",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::Upstream(_) => "UPSTREAM_FAILURE",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Database(_) => "DB_ERROR",
        }
    }

    /// HTTP 상태 코드 매핑.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DuplicateEntity => StatusCode::CONFLICT,
            ApiError::EntityInUse { .. } => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // DB 에러 상세는 로그로만 남기고 클라이언트에는 노출하지 않음
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "내부 저장소 에러".to_string()
            }
            other => other.to_string(),
        };
        let body = ApiErrorResponse::new(self.code(), message);
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "캠페인을 찾을 수 없습니다: 42",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 안정적인 에러 코드 (예: "NOT_FOUND", "DUPLICATE_ENTITY")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
}

impl ApiErrorResponse {
    /// 에러 응답 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound {
                entity: "캠페인",
                id: 1
            }
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::DuplicateEntity.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::EntityInUse {
                entity: "user",
                id: 3
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Upstream("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_stable_codes() {
        assert_eq!(ApiError::DuplicateEntity.code(), "DUPLICATE_ENTITY");
        assert_eq!(
            ApiError::EntityInUse {
                entity: "user",
                id: 3
            }
            .code(),
            "ENTITY_IN_USE"
        );
        assert_eq!(ApiError::Forbidden.code(), "FORBIDDEN");
        assert_eq!(ApiError::Unauthorized.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ApiErrorResponse::new("NOT_FOUND", "세션을 찾을 수 없습니다: 7");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ApiError::EntityInUse {
            entity: "user",
            id: 3,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
