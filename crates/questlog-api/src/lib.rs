//! TTRPG 캠페인 트래커 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 역할 검사 (동등 비교)
//! - 캠페인/세션/대사/플레이어/NPC 관리
//! - 세션 녹음 업로드
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`repository`]: 데이터베이스 접근 계층
//! - [`services`]: 외부 연동 (미디어 스토리지)
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{
    create_token, decode_token, hash_password, require_role, verify_password, AdminAuth,
    AuthService, Claims, JwtAuth, JwtError, LoginResponse,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::*;
pub use services::{MediaError, MediaStorage};
pub use state::AppState;
