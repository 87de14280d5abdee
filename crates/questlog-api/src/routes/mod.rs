//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 로그인 (토큰 발급)
//! - `/api/v1/users` - 사용자 등록 및 관리 (관리는 admin 전용)
//! - `/api/v1/campaigns` - 캠페인 관리 및 플레이어/NPC/사용자 연관
//! - `/api/v1/sessions` - 게임 세션 관리, 참가자 연관, 녹음 업로드
//! - `/api/v1/dialogs` - 세션 녹취록 대사 관리
//! - `/api/v1/players` - 플레이어 캐릭터 관리
//! - `/api/v1/npcs` - NPC 관리

pub mod auth;
pub mod campaigns;
pub mod dialogs;
pub mod health;
pub mod npcs;
pub mod players;
pub mod sessions;
pub mod users;

pub use auth::{auth_router, LoginRequest};
pub use campaigns::{campaigns_router, CampaignResponse};
pub use dialogs::dialogs_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use npcs::{npcs_router, NpcResponse};
pub use players::{players_router, PlayerResponse};
pub use sessions::{sessions_router, AudioUploadResponse, SessionResponse};
pub use users::{users_router, RegisterRequest, UserResponse};

use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 목록 조회 페이지네이션 쿼리.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    /// 건너뛸 레코드 수 (기본 0)
    #[serde(default)]
    pub offset: i64,
    /// 최대 반환 수 (기본 100, 상한 500)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// 음수 offset과 과도한 limit을 안전한 범위로 보정.
    pub fn clamp(self) -> (i64, i64) {
        (self.offset.max(0), self.limit.clamp(1, 500))
    }
}

/// 단순 성공 응답.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/users", users_router())
        .nest("/api/v1/campaigns", campaigns_router())
        .nest("/api/v1/sessions", sessions_router())
        .nest("/api/v1/dialogs", dialogs_router())
        .nest("/api/v1/players", players_router())
        .nest("/api/v1/npcs", npcs_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.offset, 0);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn test_pagination_clamp() {
        let p = Pagination {
            offset: -5,
            limit: 10_000,
        };
        assert_eq!(p.clamp(), (0, 500));

        let p = Pagination {
            offset: 20,
            limit: 0,
        };
        assert_eq!(p.clamp(), (20, 1));
    }
}
