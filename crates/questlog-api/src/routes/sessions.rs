//! 게임 세션 API 라우트
//!
//! 세션 CRUD, 참가자(플레이어/NPC) 연관, 녹음 업로드를 제공합니다.
//! 모든 라우트는 유효한 Bearer 토큰을 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/sessions` - 세션 목록
//! - `POST /api/v1/sessions` - 세션 생성
//! - `GET /api/v1/sessions/{id}` - 세션 상세
//! - `PUT /api/v1/sessions/{id}` - 세션 수정
//! - `DELETE /api/v1/sessions/{id}` - 세션 삭제
//! - `GET /api/v1/sessions/campaign/{campaign_id}` - 캠페인별 세션 목록
//! - `POST|DELETE /api/v1/sessions/{id}/players/{player_id}` - 플레이어 연관
//! - `POST|DELETE /api/v1/sessions/{id}/npcs/{npc_id}` - NPC 연관
//! - `POST /api/v1/sessions/{id}/audio` - 녹음 업로드

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiResult};
use crate::repository::{
    CampaignRepository, NewSession, NpcRepository, PlayerRepository, SessionRecord,
    SessionRepository, UpdateSession,
};
use crate::routes::{Pagination, SuccessResponse};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 세션 응답 (참가자는 ID 목록으로 투영).
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: i32,
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub audio_url: Option<String>,
    pub campaign_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 참여 플레이어 ID 목록
    pub players: Vec<i32>,
    /// 등장 NPC ID 목록
    pub npcs: Vec<i32>,
}

impl SessionResponse {
    /// 레코드에 참가자 ID 투영을 붙여 응답 구성.
    async fn load(pool: &sqlx::PgPool, session: SessionRecord) -> Result<Self, sqlx::Error> {
        let players = SessionRepository::player_ids(pool, session.id).await?;
        let npcs = SessionRepository::npc_ids(pool, session.id).await?;

        Ok(Self {
            id: session.id,
            title: session.title,
            date: session.date,
            description: session.description,
            audio_url: session.audio_url,
            campaign_id: session.campaign_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
            players,
            npcs,
        })
    }
}

/// 녹음 업로드 쿼리.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AudioUploadQuery {
    /// 저장할 파일 이름 (기본 "recording")
    #[serde(default = "default_audio_filename")]
    pub filename: String,
}

fn default_audio_filename() -> String {
    "recording".to_string()
}

/// 녹음 업로드 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AudioUploadResponse {
    pub message: String,
    /// 스토리지가 반환한 재생 URL
    pub audio_url: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/sessions - 세션 목록
async fn list_sessions(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let (offset, limit) = pagination.clamp();
    let sessions = SessionRepository::list(&state.db_pool, offset, limit).await?;

    let responses = try_join_all(
        sessions
            .into_iter()
            .map(|s| SessionResponse::load(&state.db_pool, s)),
    )
    .await?;

    Ok(Json(responses))
}

/// GET /api/v1/sessions/campaign/{campaign_id} - 캠페인별 세션 목록
async fn list_sessions_by_campaign(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<i32>,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    CampaignRepository::get_by_id(&state.db_pool, campaign_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id: campaign_id,
        })?;

    let sessions = SessionRepository::list_by_campaign(&state.db_pool, campaign_id).await?;

    let responses = try_join_all(
        sessions
            .into_iter()
            .map(|s| SessionResponse::load(&state.db_pool, s)),
    )
    .await?;

    Ok(Json(responses))
}

/// POST /api/v1/sessions - 세션 생성
///
/// 소속 캠페인이 존재해야 하며 캠페인의 `sessions_count`가 함께
/// 증가합니다.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "sessions",
    request_body = NewSession,
    responses(
        (status = 201, description = "생성 완료", body = SessionResponse),
        (status = 404, description = "캠페인 없음"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_session(
    JwtAuth(claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewSession>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    CampaignRepository::get_by_id(&state.db_pool, input.campaign_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "campaign",
            id: input.campaign_id,
        })?;

    let session = SessionRepository::create(&state.db_pool, input).await?;

    info!(by = %claims.sub, session = %session.title, "세션 생성");

    let response = SessionResponse::load(&state.db_pool, session).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/sessions/{id} - 세션 상세
async fn get_session(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<SessionResponse>> {
    let session = SessionRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;

    Ok(Json(SessionResponse::load(&state.db_pool, session).await?))
}

/// PUT /api/v1/sessions/{id} - 세션 부분 수정
async fn update_session(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateSession>,
) -> ApiResult<Json<SessionResponse>> {
    let existing = SessionRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;

    let updated = SessionRepository::update(&state.db_pool, &existing, input).await?;

    Ok(Json(SessionResponse::load(&state.db_pool, updated).await?))
}

/// DELETE /api/v1/sessions/{id} - 세션 삭제
async fn delete_session(
    JwtAuth(claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let deleted = SessionRepository::delete(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;

    info!(by = %claims.sub, session = %deleted.title, "세션 삭제");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/{id}/audio - 녹음 업로드
///
/// `audio/*` content type의 바이너리 본문을 받아 미디어 스토리지의
/// `sessions/{id}` 폴더에 업로드하고 반환된 URL을 세션에 기록합니다.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/audio",
    tag = "sessions",
    request_body(content = Vec<u8>, content_type = "audio/*"),
    responses(
        (status = 200, description = "업로드 완료", body = AudioUploadResponse),
        (status = 404, description = "세션 없음"),
        (status = 422, description = "audio/* 아님"),
        (status = 502, description = "스토리지 업로드 실패"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_audio(
    JwtAuth(claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(query): Query<AudioUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<AudioUploadResponse>> {
    SessionRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if !content_type.starts_with("audio/") {
        return Err(ApiError::Validation(
            "audio/* content type이 필요합니다".to_string(),
        ));
    }

    let audio_url = state
        .media
        .upload_session_audio(id, &query.filename, &content_type, body.to_vec())
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    SessionRepository::set_audio_url(&state.db_pool, id, &audio_url)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;

    info!(by = %claims.sub, session_id = id, "세션 녹음 업로드 완료");

    Ok(Json(AudioUploadResponse {
        message: "업로드 완료".to_string(),
        audio_url,
    }))
}

// ================================================================================================
// Association Handlers
// ================================================================================================

/// POST /api/v1/sessions/{id}/players/{player_id} - 플레이어 추가 (멱등)
async fn add_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_session_exists(&state, id).await?;
    PlayerRepository::get_by_id(&state.db_pool, player_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "player",
            id: player_id,
        })?;

    let added = SessionRepository::add_player(&state.db_pool, id, player_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if added {
            format!("플레이어 {player_id} 추가됨")
        } else {
            format!("플레이어 {player_id}는 이미 참여 중")
        },
    }))
}

/// DELETE /api/v1/sessions/{id}/players/{player_id} - 플레이어 제거 (멱등)
async fn remove_player(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_session_exists(&state, id).await?;

    let removed = SessionRepository::remove_player(&state.db_pool, id, player_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if removed {
            format!("플레이어 {player_id} 제거됨")
        } else {
            format!("플레이어 {player_id}는 참여하지 않음")
        },
    }))
}

/// POST /api/v1/sessions/{id}/npcs/{npc_id} - NPC 추가 (멱등)
async fn add_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, npc_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_session_exists(&state, id).await?;
    NpcRepository::get_by_id(&state.db_pool, npc_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "npc",
            id: npc_id,
        })?;

    let added = SessionRepository::add_npc(&state.db_pool, id, npc_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if added {
            format!("NPC {npc_id} 추가됨")
        } else {
            format!("NPC {npc_id}는 이미 등장 중")
        },
    }))
}

/// DELETE /api/v1/sessions/{id}/npcs/{npc_id} - NPC 제거 (멱등)
async fn remove_npc(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path((id, npc_id)): Path<(i32, i32)>,
) -> ApiResult<Json<SuccessResponse>> {
    ensure_session_exists(&state, id).await?;

    let removed = SessionRepository::remove_npc(&state.db_pool, id, npc_id).await?;

    Ok(Json(SuccessResponse {
        success: true,
        message: if removed {
            format!("NPC {npc_id} 제거됨")
        } else {
            format!("NPC {npc_id}는 등장하지 않음")
        },
    }))
}

async fn ensure_session_exists(state: &AppState, id: i32) -> ApiResult<()> {
    SessionRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id,
        })?;
    Ok(())
}

// ================================================================================================
// Router
// ================================================================================================

/// 세션 라우터 생성.
pub fn sessions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/campaign/{campaign_id}", get(list_sessions_by_campaign))
        .route("/{id}/audio", post(upload_audio))
        .route(
            "/{id}/players/{player_id}",
            post(add_player).delete(remove_player),
        )
        .route("/{id}/npcs/{npc_id}", post(add_npc).delete(remove_npc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_upload_query_default_filename() {
        let query: AudioUploadQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.filename, "recording");
    }
}
