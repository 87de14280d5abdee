//! Dialog Repository
//!
//! 세션 녹취록의 대사 한 줄을 다룹니다. 타임스탬프는 "HH:MM:SS"
//! 형식의 문자열이며 `speaker_id`는 미식별 화자일 때 비어 있습니다.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

// ================================================================================================
// Types
// ================================================================================================

/// 대사 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DialogRecord {
    pub id: i32,
    /// 세션 내 대사 순번
    pub line_order: i32,
    /// 발화 시작 시각 ("HH:MM:SS")
    pub start_time: String,
    /// 발화 종료 시각 ("HH:MM:SS")
    #[sqlx(default)]
    pub end_time: Option<String>,
    /// 화자 플레이어 ID (미식별이면 None)
    #[sqlx(default)]
    pub speaker_id: Option<i32>,
    pub content: String,
    pub session_id: i32,
}

/// 새 대사 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewDialog {
    pub line_order: i32,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub speaker_id: Option<i32>,
    pub content: String,
    pub session_id: i32,
}

/// 대사 부분 업데이트 입력. `session_id`는 이동 불가.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDialog {
    #[serde(default)]
    pub line_order: Option<i32>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub speaker_id: Option<i32>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UpdateDialog {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    pub fn merge(self, existing: &DialogRecord) -> DialogRecord {
        DialogRecord {
            id: existing.id,
            line_order: self.line_order.unwrap_or(existing.line_order),
            start_time: self.start_time.unwrap_or_else(|| existing.start_time.clone()),
            end_time: self.end_time.or_else(|| existing.end_time.clone()),
            speaker_id: self.speaker_id.or(existing.speaker_id),
            content: self.content.unwrap_or_else(|| existing.content.clone()),
            session_id: existing.session_id,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Dialog Repository.
pub struct DialogRepository;

impl DialogRepository {
    /// ID로 대사 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<DialogRecord>, sqlx::Error> {
        sqlx::query_as::<_, DialogRecord>("SELECT * FROM dialogs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 대사 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<DialogRecord>, sqlx::Error> {
        sqlx::query_as::<_, DialogRecord>("SELECT * FROM dialogs ORDER BY id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// 특정 세션의 녹취록 조회 (대사 순번 순).
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: i32,
    ) -> Result<Vec<DialogRecord>, sqlx::Error> {
        sqlx::query_as::<_, DialogRecord>(
            "SELECT * FROM dialogs WHERE session_id = $1 ORDER BY line_order, id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    /// 대사 생성.
    pub async fn create(pool: &PgPool, input: NewDialog) -> Result<DialogRecord, sqlx::Error> {
        sqlx::query_as::<_, DialogRecord>(
            r#"
            INSERT INTO dialogs (line_order, start_time, end_time, speaker_id, content, session_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.line_order)
        .bind(&input.start_time)
        .bind(&input.end_time)
        .bind(input.speaker_id)
        .bind(&input.content)
        .bind(input.session_id)
        .fetch_one(pool)
        .await
    }

    /// 대사 부분 업데이트.
    pub async fn update(
        pool: &PgPool,
        existing: &DialogRecord,
        input: UpdateDialog,
    ) -> Result<DialogRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, DialogRecord>(
            r#"
            UPDATE dialogs
            SET line_order = $2, start_time = $3, end_time = $4, speaker_id = $5, content = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(merged.line_order)
        .bind(&merged.start_time)
        .bind(&merged.end_time)
        .bind(merged.speaker_id)
        .bind(&merged.content)
        .fetch_one(pool)
        .await
    }

    /// 대사 삭제 (hard delete).
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<DialogRecord>, sqlx::Error> {
        sqlx::query_as::<_, DialogRecord>("DELETE FROM dialogs WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dialog() -> DialogRecord {
        DialogRecord {
            id: 42,
            line_order: 3,
            start_time: "00:04:12".to_string(),
            end_time: Some("00:04:25".to_string()),
            speaker_id: Some(5),
            content: "I search the room for traps.".to_string(),
            session_id: 7,
        }
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_dialog();
        let merged = UpdateDialog::default().merge(&existing);

        assert_eq!(merged.line_order, existing.line_order);
        assert_eq!(merged.start_time, existing.start_time);
        assert_eq!(merged.end_time, existing.end_time);
        assert_eq!(merged.speaker_id, existing.speaker_id);
        assert_eq!(merged.content, existing.content);
        assert_eq!(merged.session_id, existing.session_id);
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let existing = sample_dialog();
        let update = UpdateDialog {
            content: Some("I roll perception.".to_string()),
            speaker_id: Some(9),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.content, "I roll perception.");
        assert_eq!(merged.speaker_id, Some(9));
        assert_eq!(merged.start_time, "00:04:12");
        assert_eq!(merged.session_id, 7);
    }

    #[test]
    fn test_new_dialog_unattributed_speaker() {
        let input: NewDialog = serde_json::from_str(
            r#"{"line_order": 1, "start_time": "00:00:00", "content": "...", "session_id": 7}"#,
        )
        .unwrap();

        assert!(input.speaker_id.is_none());
        assert!(input.end_time.is_none());
    }
}
