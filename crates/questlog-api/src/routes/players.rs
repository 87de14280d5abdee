//! 플레이어 API 라우트
//!
//! 플레이어 캐릭터 CRUD와 사용자별 조회를 제공합니다. 모든
//! 라우트는 유효한 Bearer 토큰을 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/players` - 플레이어 목록
//! - `POST /api/v1/players` - 플레이어 생성
//! - `GET /api/v1/players/{id}` - 플레이어 상세
//! - `PUT /api/v1/players/{id}` - 플레이어 수정
//! - `DELETE /api/v1/players/{id}` - 플레이어 삭제
//! - `GET /api/v1/players/user/{user_id}` - 사용자 소유 플레이어 목록

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
use crate::repository::{
    NewPlayer, PlayerRecord, PlayerRepository, UpdatePlayer, UserRepository,
};
use crate::routes::Pagination;
use crate::state::AppState;

// ================================================================================================
// Response Types
// ================================================================================================

/// 플레이어 응답 (캠페인/세션 연관은 ID 목록으로 투영).
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    #[serde(flatten)]
    pub player: PlayerRecord,
    /// 소속 캠페인 ID 목록
    pub campaigns: Vec<i32>,
    /// 참여 세션 ID 목록
    pub sessions: Vec<i32>,
}

impl PlayerResponse {
    /// 레코드에 연관 ID 투영을 붙여 응답 구성.
    async fn load(pool: &sqlx::PgPool, player: PlayerRecord) -> Result<Self, sqlx::Error> {
        let campaigns = PlayerRepository::campaign_ids(pool, player.id).await?;
        let sessions = PlayerRepository::session_ids(pool, player.id).await?;

        Ok(Self {
            player,
            campaigns,
            sessions,
        })
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/players - 플레이어 목록
async fn list_players(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<PlayerResponse>>> {
    let (offset, limit) = pagination.clamp();
    let players = PlayerRepository::list(&state.db_pool, offset, limit).await?;

    let responses = try_join_all(
        players
            .into_iter()
            .map(|p| PlayerResponse::load(&state.db_pool, p)),
    )
    .await?;

    Ok(Json(responses))
}

/// GET /api/v1/players/user/{user_id} - 사용자 소유 플레이어 목록
async fn list_players_by_user(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Vec<PlayerResponse>>> {
    UserRepository::get_by_id(&state.db_pool, user_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "user",
            id: user_id,
        })?;

    let players = PlayerRepository::list_by_user(&state.db_pool, user_id).await?;

    let responses = try_join_all(
        players
            .into_iter()
            .map(|p| PlayerResponse::load(&state.db_pool, p)),
    )
    .await?;

    Ok(Json(responses))
}

/// POST /api/v1/players - 플레이어 생성
///
/// 소유 사용자가 존재해야 합니다.
async fn create_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewPlayer>,
) -> ApiResult<(StatusCode, Json<PlayerResponse>)> {
    UserRepository::get_by_id(&state.db_pool, input.user_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "user",
            id: input.user_id,
        })?;

    let player = PlayerRepository::create(&state.db_pool, input).await?;

    let response = PlayerResponse::load(&state.db_pool, player).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/players/{id} - 플레이어 상세
async fn get_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PlayerResponse>> {
    let player = PlayerRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "player", id })?;

    Ok(Json(PlayerResponse::load(&state.db_pool, player).await?))
}

/// PUT /api/v1/players/{id} - 플레이어 부분 수정
async fn update_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdatePlayer>,
) -> ApiResult<Json<PlayerResponse>> {
    let existing = PlayerRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "player", id })?;

    let updated = PlayerRepository::update(&state.db_pool, &existing, input).await?;

    Ok(Json(PlayerResponse::load(&state.db_pool, updated).await?))
}

/// DELETE /api/v1/players/{id} - 플레이어 삭제
async fn delete_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    PlayerRepository::delete(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "player", id })?;

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// 플레이어 라우터 생성.
pub fn players_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_players).post(create_player))
        .route(
            "/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
        .route("/user/{user_id}", get(list_players_by_user))
}
