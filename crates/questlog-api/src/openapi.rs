//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

// ==================== 각 모듈에서 스키마 Import ====================

use questlog_core::{CampaignGenre, CampaignStatus, UserRole};

use crate::auth::LoginResponse;
use crate::error::ApiErrorResponse;
use crate::repository::{
    CampaignRecord, DialogRecord, NewCampaign, NewDialog, NewNpc, NewPlayer, NewSession,
    NpcRecord, PlayerRecord, SessionRecord, UpdateCampaign, UpdateDialog, UpdateNpc,
    UpdatePlayer, UpdateSession, UpdateUser,
};
use crate::routes::{
    AudioUploadResponse, CampaignResponse, ComponentHealth, ComponentStatus, HealthResponse,
    LoginRequest, NpcResponse, PlayerResponse, RegisterRequest, SessionResponse, UserResponse,
};

// ==================== OpenAPI 문서 정의 ====================

/// QuestLog API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QuestLog Campaign API",
        version = "0.1.0",
        description = r#"
# QuestLog TTRPG 캠페인 트래커 REST API

테이블탑 RPG 캠페인, 게임 세션, 녹취록, 캐릭터를 관리하는 REST API입니다.

## 주요 기능

- **사용자**: 등록, 로그인, admin 전용 사용자 관리
- **캠페인**: 캠페인 CRUD 및 플레이어/NPC/접근 사용자 연관
- **세션**: 게임 세션 CRUD, 참가자 관리, 녹음 업로드
- **대사**: 세션 녹취록 관리
- **플레이어/NPC**: 캐릭터 시트 관리

## 인증

로그인과 회원 등록을 제외한 모든 엔드포인트는 JWT Bearer 토큰이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요. 역할 검사는 동등
비교입니다 (계층 없음).
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "QuestLog Team",
            url = "https://github.com/user/questlog"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인 및 토큰 발급"),
        (name = "users", description = "사용자 - 등록 및 admin 관리"),
        (name = "campaigns", description = "캠페인 - CRUD 및 연관 관리"),
        (name = "sessions", description = "세션 - CRUD, 참가자, 녹음 업로드"),
        (name = "dialogs", description = "대사 - 세션 녹취록"),
        (name = "players", description = "플레이어 - 캐릭터 시트"),
        (name = "npcs", description = "NPC - 게임 마스터 캐릭터")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            UserRole,
            CampaignGenre,
            CampaignStatus,

            // ===== Auth / Users =====
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            UserResponse,
            UpdateUser,

            // ===== Campaigns =====
            CampaignRecord,
            NewCampaign,
            UpdateCampaign,
            CampaignResponse,

            // ===== Sessions =====
            SessionRecord,
            NewSession,
            UpdateSession,
            SessionResponse,
            AudioUploadResponse,

            // ===== Dialogs =====
            DialogRecord,
            NewDialog,
            UpdateDialog,

            // ===== Players / NPCs =====
            PlayerRecord,
            NewPlayer,
            UpdatePlayer,
            PlayerResponse,
            NpcRecord,
            NewNpc,
            UpdateNpc,
            NpcResponse,
        )
    ),
    modifiers(&SecurityAddon),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,

        // ===== Users =====
        crate::routes::users::register,
        crate::routes::users::list_users,

        // ===== Campaigns =====
        crate::routes::campaigns::list_campaigns,
        crate::routes::campaigns::create_campaign,

        // ===== Sessions =====
        crate::routes::sessions::create_session,
        crate::routes::sessions::upload_audio,
    )
)]
pub struct ApiDoc;

/// Bearer 토큰 security scheme 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        // 기본 정보 확인
        assert!(json.contains("QuestLog Campaign API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("campaigns"));
        assert!(json.contains("sessions"));

        // 경로 확인
        assert!(json.contains("/health"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/campaigns"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("HealthResponse"));
        assert!(json.contains("LoginResponse"));
        assert!(json.contains("CampaignResponse"));
        assert!(json.contains("ApiErrorResponse"));
    }
}
