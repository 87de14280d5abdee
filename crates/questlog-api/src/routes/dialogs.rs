//! 대사 API 라우트
//!
//! 세션 녹취록의 대사 CRUD를 제공합니다. 모든 라우트는 유효한
//! Bearer 토큰을 요구합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/dialogs` - 대사 목록
//! - `POST /api/v1/dialogs` - 대사 생성
//! - `GET /api/v1/dialogs/{id}` - 대사 상세
//! - `PUT /api/v1/dialogs/{id}` - 대사 수정
//! - `DELETE /api/v1/dialogs/{id}` - 대사 삭제
//! - `GET /api/v1/dialogs/session/{session_id}` - 세션 녹취록 (순번 순)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiResult};
use crate::repository::{
    DialogRecord, DialogRepository, NewDialog, SessionRepository, UpdateDialog,
};
use crate::routes::Pagination;
use crate::state::AppState;

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/v1/dialogs - 대사 목록
async fn list_dialogs(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<DialogRecord>>> {
    let (offset, limit) = pagination.clamp();
    let dialogs = DialogRepository::list(&state.db_pool, offset, limit).await?;
    Ok(Json(dialogs))
}

/// GET /api/v1/dialogs/session/{session_id} - 세션 녹취록
///
/// `line_order` 순으로 정렬된 전체 대사를 반환합니다.
async fn list_dialogs_by_session(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<i32>,
) -> ApiResult<Json<Vec<DialogRecord>>> {
    SessionRepository::get_by_id(&state.db_pool, session_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id: session_id,
        })?;

    let dialogs = DialogRepository::list_by_session(&state.db_pool, session_id).await?;
    Ok(Json(dialogs))
}

/// POST /api/v1/dialogs - 대사 생성
async fn create_dialog(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewDialog>,
) -> ApiResult<(StatusCode, Json<DialogRecord>)> {
    SessionRepository::get_by_id(&state.db_pool, input.session_id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "session",
            id: input.session_id,
        })?;

    let dialog = DialogRepository::create(&state.db_pool, input).await?;
    Ok((StatusCode::CREATED, Json(dialog)))
}

/// GET /api/v1/dialogs/{id} - 대사 상세
async fn get_dialog(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<DialogRecord>> {
    let dialog = DialogRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "dialog", id })?;

    Ok(Json(dialog))
}

/// PUT /api/v1/dialogs/{id} - 대사 부분 수정
async fn update_dialog(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateDialog>,
) -> ApiResult<Json<DialogRecord>> {
    let existing = DialogRepository::get_by_id(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "dialog", id })?;

    let updated = DialogRepository::update(&state.db_pool, &existing, input).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/dialogs/{id} - 대사 삭제
async fn delete_dialog(
    JwtAuth(_claims): JwtAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    DialogRepository::delete(&state.db_pool, id)
        .await?
        .ok_or(ApiError::NotFound { entity: "dialog", id })?;

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// 대사 라우터 생성.
pub fn dialogs_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_dialogs).post(create_dialog))
        .route(
            "/{id}",
            get(get_dialog).put(update_dialog).delete(delete_dialog),
        )
        .route("/session/{session_id}", get(list_dialogs_by_session))
}
