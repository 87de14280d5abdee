//! 인증 및 권한 부여.
//!
//! JWT 기반 인증과 역할 동등성 검사를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체 (sub + role)
//! - [`JwtAuth`]: Axum 핸들러용 JWT 검증 추출기
//! - [`AdminAuth`]: admin 역할 전용 추출기
//! - [`AuthService`]: 자격증명 검증 및 토큰 발급
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     JwtAuth(claims): JwtAuth,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.sub)
//! }
//! ```

mod extractor;
mod jwt;
mod password;
mod service;

pub use extractor::{require_role, AdminAuth, JwtAuth};
pub use jwt::{create_token, decode_token, Claims, JwtError};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{AuthService, LoginResponse};
