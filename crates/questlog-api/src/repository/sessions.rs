//! Session Repository
//!
//! 게임 세션 관련 데이터베이스 연산을 담당합니다. 세션 생성은
//! 소속 캠페인의 `sessions_count` 증가와 한 트랜잭션으로 묶입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

// ================================================================================================
// Types
// ================================================================================================

/// 게임 세션 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionRecord {
    pub id: i32,
    pub title: String,
    /// 세션이 열린 (또는 열릴) 시각
    pub date: DateTime<Utc>,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 업로드된 세션 녹음 URL
    #[sqlx(default)]
    pub audio_url: Option<String>,
    pub campaign_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 세션 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSession {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    pub campaign_id: i32,
}

/// 세션 부분 업데이트 입력.
///
/// `campaign_id`는 이동 불가이며 `audio_url`은 업로드 전용
/// 엔드포인트로만 변경됩니다.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSession {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateSession {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    pub fn merge(self, existing: &SessionRecord) -> SessionRecord {
        SessionRecord {
            id: existing.id,
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            date: self.date.unwrap_or(existing.date),
            description: self.description.or_else(|| existing.description.clone()),
            audio_url: existing.audio_url.clone(),
            campaign_id: existing.campaign_id,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Session Repository.
pub struct SessionRepository;

impl SessionRepository {
    /// ID로 세션 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<SessionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 세션 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SessionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions ORDER BY id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// 특정 캠페인의 세션 목록 조회.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: i32,
    ) -> Result<Vec<SessionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM sessions WHERE campaign_id = $1 ORDER BY id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// 세션 생성.
    ///
    /// INSERT와 캠페인의 `sessions_count` 증가가 한 트랜잭션으로
    /// 커밋됩니다. 둘 중 하나라도 실패하면 전부 롤백됩니다.
    pub async fn create(pool: &PgPool, input: NewSession) -> Result<SessionRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let session = sqlx::query_as::<_, SessionRecord>(
            r#"
            INSERT INTO sessions (title, date, description, campaign_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(input.date)
        .bind(&input.description)
        .bind(input.campaign_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE campaigns SET sessions_count = sessions_count + 1 WHERE id = $1")
            .bind(input.campaign_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(session)
    }

    /// 세션 부분 업데이트.
    pub async fn update(
        pool: &PgPool,
        existing: &SessionRecord,
        input: UpdateSession,
    ) -> Result<SessionRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, SessionRecord>(
            r#"
            UPDATE sessions
            SET title = $2, date = $3, description = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(&merged.title)
        .bind(merged.date)
        .bind(&merged.description)
        .fetch_one(pool)
        .await
    }

    /// 업로드 완료된 녹음 URL 저장.
    pub async fn set_audio_url(
        pool: &PgPool,
        id: i32,
        audio_url: &str,
    ) -> Result<Option<SessionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SessionRecord>(
            "UPDATE sessions SET audio_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(audio_url)
        .fetch_optional(pool)
        .await
    }

    /// 세션 삭제 (hard delete).
    ///
    /// 소속 대사와 연관 테이블 행은 FK CASCADE로 함께 제거됩니다.
    /// `sessions_count`는 생성 시에만 증가하는 누적 카운터라
    /// 삭제해도 줄지 않습니다.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<SessionRecord>, sqlx::Error> {
        sqlx::query_as::<_, SessionRecord>("DELETE FROM sessions WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Associations (멱등: 중복 추가/부재 제거는 no-op)
    // ============================================================================================

    /// 세션에 플레이어 추가.
    pub async fn add_player(
        pool: &PgPool,
        session_id: i32,
        player_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO session_players (session_id, player_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(session_id)
        .bind(player_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 세션에서 플레이어 제거.
    pub async fn remove_player(
        pool: &PgPool,
        session_id: i32,
        player_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM session_players WHERE session_id = $1 AND player_id = $2")
                .bind(session_id)
                .bind(player_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 세션에 NPC 추가.
    pub async fn add_npc(pool: &PgPool, session_id: i32, npc_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO session_npcs (session_id, npc_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(session_id)
        .bind(npc_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 세션에서 NPC 제거.
    pub async fn remove_npc(
        pool: &PgPool,
        session_id: i32,
        npc_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM session_npcs WHERE session_id = $1 AND npc_id = $2")
            .bind(session_id)
            .bind(npc_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================================================================
    // Projections
    // ============================================================================================

    /// 세션 참여 플레이어 ID 목록.
    pub async fn player_ids(pool: &PgPool, session_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT player_id FROM session_players WHERE session_id = $1 ORDER BY player_id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    /// 세션 등장 NPC ID 목록.
    pub async fn npc_ids(pool: &PgPool, session_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT npc_id FROM session_npcs WHERE session_id = $1 ORDER BY npc_id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> SessionRecord {
        SessionRecord {
            id: 7,
            title: "Session Zero".to_string(),
            date: Utc::now(),
            description: None,
            audio_url: Some("https://media.example/sessions/7/rec.mp3".to_string()),
            campaign_id: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_session();
        let merged = UpdateSession::default().merge(&existing);

        assert_eq!(merged.title, existing.title);
        assert_eq!(merged.date, existing.date);
        assert_eq!(merged.description, existing.description);
        assert_eq!(merged.audio_url, existing.audio_url);
        assert_eq!(merged.campaign_id, existing.campaign_id);
    }

    #[test]
    fn test_merge_cannot_move_session_or_touch_audio() {
        let existing = sample_session();
        let update = UpdateSession {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.campaign_id, 10);
        assert_eq!(
            merged.audio_url.as_deref(),
            Some("https://media.example/sessions/7/rec.mp3")
        );
    }

    #[test]
    fn test_new_session_optional_description() {
        let input: NewSession = serde_json::from_str(
            r#"{"title": "Session Zero", "date": "2025-03-01T19:00:00Z", "campaign_id": 10}"#,
        )
        .unwrap();

        assert!(input.description.is_none());
        assert_eq!(input.campaign_id, 10);
    }
}
