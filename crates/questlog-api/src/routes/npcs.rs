//! NPC API 라우트
//!
//! NPC CRUD를 제공합니다. 모든 라우트는 유효한 Bearer 토큰을
//! 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/npcs` - NPC 목록
//! - `POST /api/v1/npcs` - NPC 생성
//! - `GET /api/v1/npcs/{id}` - NPC 상세
//! - `PUT /api/v1/npcs/{id}` - NPC 수정
//! - `DELETE /api/v1/npcs/{id}` - NPC 삭제

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiResult};
use crate::repository::{NewNpc, NpcRecord, NpcRepository, UpdateNpc};
use crate::routes::Pagination;
use crate::state::AppState;

// ================================================================================================
// Response Types
// ================================================================================================

/// NPC 응답 (캠페인/세션 연관은 ID 목록으로 투영).
#[derive(Debug, Serialize, ToSchema)]
pub struct NpcResponse {
    #[serde(flatten)]
    pub npc: NpcRecord,
    /// 등장 캠페인 ID 목록
    pub campaigns: Vec<i32>,
    /// 등장 세션 ID 목록
    pub sessions: Vec<i32>,
}

impl NpcResponse {
    /// 레코드에 연관 ID 투영을 붙여 응답 구성.
    async fn load(pool: &sqlx::PgPool, npc: NpcRecord) -> Result<Self, sqlx::Error> {
        let campaigns = NpcRepository::campaign_ids(pool, npc.id).await?;
        let sessions = NpcRepository::session_ids(pool, npc.id).await?;

        Ok(Self {
            npc,
            campaigns,
            sessions,
        })
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/npcs - NPC 목록
async fn list_npcs(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<NpcResponse>>> {
    let (offset, limit) = pagination.clamp();
    let npcs = NpcRepository::list(&state.db_pool, offset, limit).await?;

    let responses = try_join_all(
        npcs.into_iter()
            .map(|n| NpcResponse::load(&state.db_pool, n)),
    )
    .await?;

    Ok(Json(responses))
}

/// POST /api/v1/npcs - NPC 생성
async fn create_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewNpc>,
) -> ApiResult<(StatusCode, Json<NpcResponse>)> {
    let npc = NpcRepository::create(&state.db_pool, input).await?;

    let response = NpcResponse::load(&state.db_pool, npc).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/npcs/{id} - NPC 상세
async fn get_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<NpcResponse>> {
    let npc = NpcRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "npc", id })?;

    Ok(Json(NpcResponse::load(&state.db_pool, npc).await?))
}

/// PUT /api/v1/npcs/{id} - NPC 부분 수정
async fn update_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateNpc>,
) -> ApiResult<Json<NpcResponse>> {
    let existing = NpcRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "npc", id })?;

    let updated = NpcRepository::update(&state.db_pool, &existing, input).await?;

    Ok(Json(NpcResponse::load(&state.db_pool, updated).await?))
}

/// DELETE /api/v1/npcs/{id} - NPC 삭제
async fn delete_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    NpcRepository::delete(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "npc", id })?;

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// NPC 라우터 생성.
pub fn npcs_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_npcs).post(create_npc))
        .route("/{id}", get(get_npc).put(update_npc).delete(delete_npc))
}
