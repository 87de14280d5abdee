//! 캠페인 트래커의 핵심 도메인 타입.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 도메인 열거형 (사용자 역할, 캠페인 장르/상태)
//! - 환경변수 기반 설정 ([`Settings`])
//! - tracing 기반 로깅 초기화
//!
//! # 모듈 구성
//!
//! - [`domain`]: 엔티티 공통 열거형
//! - [`config`]: 시작 시 한 번 로드되어 주입되는 설정 구조체
//! - [`logging`]: 로그 포맷/레벨 설정 및 초기화

pub mod config;
pub mod domain;
pub mod logging;

pub use config::{ConfigError, Settings};
pub use domain::{CampaignGenre, CampaignStatus, UserRole};
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
