//! 캠페인 API 라우트
//!
//! 캠페인 CRUD와 플레이어/NPC/접근 사용자 연관 관리를 제공합니다.
//! 모든 라우트는 유효한 Bearer 토큰을 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/campaigns` - 캠페인 목록
//! - `POST /api/v1/campaigns` - 캠페인 생성
//! - `GET /api/v1/campaigns/{id}` - 캠페인 상세
//! - `PUT /api/v1/campaigns/{id}` - 캠페인 수정
//! - `DELETE /api/v1/campaigns/{id}` - 캠페인 삭제
//! - `POST|DELETE /api/v1/campaigns/{id}/players/{player_id}` - 플레이어 연관
//! - `POST|DELETE /api/v1/campaigns/{id}/npcs/{npc_id}` - NPC 연관
//! - `POST|DELETE /api/v1/campaigns/{id}/users/{user_id}` - 접근 사용자 연관

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use questlog_core::{CampaignGenre, CampaignStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiResult};
use crate::repository::{
    CampaignRecord, CampaignRepository, NewCampaign, NpcRepository, PlayerRepository,
    UpdateCampaign, UserRepository,
};
use crate::routes::{Pagination, SuccessResponse};
use crate::state::AppState;

// ================================================================================================
// Response Types
// ================================================================================================

/// 캠페인 응답 (연관은 ID 목록으로 투영).
#[derive(Debug, Serialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i32,
    pub name: String,
    pub genre: CampaignGenre,
    pub description: Option<String>,
    pub map_url: Option<String>,
    pub notes_url: Option<String>,
    pub status: CampaignStatus,
    pub sessions_count: i32,
    pub created_by: i32,
    pub mj_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 소속 플레이어 ID 목록
    pub players: Vec<i32>,
    /// 소속 NPC ID 목록
    pub npcs: Vec<i32>,
    /// 접근 가능 사용자 ID 목록
    pub authorized_users: Vec<i32>,
}

impl CampaignResponse {
    /// 레코드에 연관 ID 투영을 붙여 응답 구성.
    async fn load(pool: &sqlx::PgPool, campaign: CampaignRecord) -> Result<Self, sqlx::Error> {
        let players = CampaignRepository::player_ids(pool, campaign.id).await?;
        let npcs = CampaignRepository::npc_ids(pool, campaign.id).await?;
        let authorized_users = CampaignRepository::authorized_user_ids(pool, campaign.id).await?;

        Ok(Self {
            id: campaign.id,
            name: campaign.name,
            genre: campaign.genre,
            description: campaign.description,
            map_url: campaign.map_url,
            notes_url: campaign.notes_url,
            status: campaign.status,
            sessions_count: campaign.sessions_count,
            created_by: campaign.created_by,
            mj_id: campaign.mj_id,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
            players,
            npcs,
            authorized_users,
        })
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/campaigns - 캠페인 목록
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    responses(
        (status = 200, description = "캠페인 목록", body = [CampaignResponse]),
        (status = 401, description = "토큰 없음/무효"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_campaigns(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<CampaignResponse>>> {
    let (offset, limit) = pagination.clamp();
    let campaigns = CampaignRepository::list(&state.db_pool, offset, limit).await?;

    let responses = try_join_all(
        campaigns
            .into_iter()
            .map(|c| CampaignResponse::load(&state.db_pool, c)),
    )
    .await?;

    Ok(Json(responses))
}

/// POST /api/v1/campaigns - 캠페인 생성
///
/// 생성자와 게임 마스터 사용자가 존재해야 합니다.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    request_body = NewCampaign,
    responses(
        (status = 201, description = "생성 완료", body = CampaignResponse),
        (status = 404, description = "참조한 사용자 없음"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_campaign(
    JwtAuth(claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewCampaign>,
) -> ApiResult<(StatusCode, Json<CampaignResponse>)> {
    // FK 위반 대신 명확한 404를 돌려주기 위한 선행 조회
    ensure_user_exists(&state, input.created_by).await?;
    ensure_user_exists(&state, input.mj_id).await?;

    let campaign = CampaignRepository::create(&state.db_pool, input).await?;

    info!(by = %claims.sub, campaign = %campaign.name, "캠페인 생성");

    let response = CampaignResponse::load(&state.db_pool, campaign).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/campaigns/{id} - 캠페인 상세
async fn get_campaign(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign = CampaignRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id,
        })?;

    Ok(Json(CampaignResponse::load(&state.db_pool, campaign).await?))
}

/// PUT /api/v1/campaigns/{id} - 캠페인 부분 수정
///
/// 빈 본문도 허용되며 이 경우 `updated_at`만 갱신됩니다.
async fn update_campaign(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateCampaign>,
) -> ApiResult<Json<CampaignResponse>> {
    let existing = CampaignRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id,
        })?;

    if let Some(mj_id) = input.mj_id {
        ensure_user_exists(&state, mj_id).await?;
    }

    let updated = CampaignRepository::update(&state.db_pool, &existing, input).await?;

    Ok(Json(CampaignResponse::load(&state.db_pool, updated).await?))
}

/// DELETE /api/v1/campaigns/{id} - 캠페인 삭제
///
/// 소속 세션과 대사는 CASCADE로 함께 삭제됩니다.
async fn delete_campaign(
    JwtAuth(claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let deleted = CampaignRepository::delete(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id,
        })?;

    info!(by = %claims.sub, campaign = %deleted.name, "캠페인 삭제");

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Association Handlers
// ================================================================================================

/// POST /api/v1/campaigns/{id}/players/{player_id} - 플레이어 추가 (멱등)
async fn add_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;
    ensure_player_exists(&state, player_id).await?;

    let added = CampaignRepository::add_player(&state.db_pool, id, player_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if added {
            format!("플레이어 {player_id} 추가됨")
        } else {
            format!("플레이어 {player_id}는 이미 소속되어 있음")
        },
    }))
}

/// DELETE /api/v1/campaigns/{id}/players/{player_id} - 플레이어 제거 (멱등)
async fn remove_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;

    let removed = CampaignRepository::remove_player(&state.db_pool, id, player_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if removed {
            format!("플레이어 {player_id} 제거됨")
        } else {
            format!("플레이어 {player_id}는 소속되어 있지 않음")
        },
    }))
}

/// POST /api/v1/campaigns/{id}/npcs/{npc_id} - NPC 추가 (멱등)
async fn add_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, npc_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;
    ensure_npc_exists(&state, npc_id).await?;

    let added = CampaignRepository::add_npc(&state.db_pool, id, npc_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if added {
            format!("NPC {npc_id} 추가됨")
        } else {
            format!("NPC {npc_id}는 이미 소속되어 있음")
        },
    }))
}

/// DELETE /api/v1/campaigns/{id}/npcs/{npc_id} - NPC 제거 (멱등)
async fn remove_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, npc_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;

    let removed = CampaignRepository::remove_npc(&state.db_pool, id, npc_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if removed {
            format!("NPC {npc_id} 제거됨")
        } else {
            format!("NPC {npc_id}는 소속되어 있지 않음")
        },
    }))
}

/// POST /api/v1/campaigns/{id}/users/{user_id} - 접근 사용자 추가 (멱등)
async fn add_user(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;
    ensure_user_exists(&state, user_id).await?;

    let added = CampaignRepository::add_user(&state.db_pool, id, user_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if added {
            format!("사용자 {user_id} 접근 허용됨")
        } else {
            format!("사용자 {user_id}는 이미 접근 가능함")
        },
    }))
}

/// DELETE /api/v1/campaigns/{id}/users/{user_id} - 접근 사용자 제거 (멱등)
async fn remove_user(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_campaign_exists(&state, id).await?;

    let removed = CampaignRepository::remove_user(&state.db_pool, id, user_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if removed {
            format!("사용자 {user_id} 접근 해제됨")
        } else {
            format!("사용자 {user_id}는 접근 권한이 없음")
        },
    }))
}

// ================================================================================================
// Helpers
// ================================================================================================

async fn ensure_campaign_exists(state: &AppState, id: i32) -> ApiResult<()> {
    CampaignRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id,
        })?;
    Ok(())
}

async fn ensure_user_exists(state: &AppState, id: i32) -> ApiResult<()> {
    UserRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "user", id })?;
    Ok(())
}

async fn ensure_player_exists(state: &AppState, id: i32) -> ApiResult<()> {
    PlayerRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "player",
            id,
        })?;
    Ok(())
}

async fn ensure_npc_exists(state: &AppState, id: i32) -> ApiResult<()> {
    NpcRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "npc", id })?;
    Ok(())
}

// ================================================================================================
// Router
// ================================================================================================

/// 캠페인 라우터 생성.
pub fn campaigns_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_campaigns).post(create_campaign))
        .route(
            "/{id}",
            get(get_campaign).put(update_campaign).delete(delete_campaign),
        )
        .route(
            "/{id}/players/{player_id}",
            post(add_player).delete(remove_player),
        )
        .route("/{id}/npcs/{npc_id}", post(add_npc).delete(remove_npc))
        .route("/{id}/users/{user_id}", post(add_user).delete(remove_user))
}
