//! Campaign Repository
//!
//! 캠페인 관련 데이터베이스 연산을 담당합니다. 플레이어/NPC/
//! 접근 사용자와의 다대다 연관 변경은 멱등합니다.

use chrono::{DateTime, Utc};
use questlog_core::{CampaignGenre, CampaignStatus};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

// ================================================================================================
// Types
// ================================================================================================

/// 캠페인 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CampaignRecord {
    pub id: i32,
    pub name: String,
    pub genre: CampaignGenre,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub map_url: Option<String>,
    #[sqlx(default)]
    pub notes_url: Option<String>,
    pub status: CampaignStatus,
    pub sessions_count: i32,
    /// 캠페인 생성자 (users.id)
    pub created_by: i32,
    /// 게임 마스터 (users.id)
    pub mj_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 캠페인 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCampaign {
    pub name: String,
    #[serde(default)]
    pub genre: CampaignGenre,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub notes_url: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
    pub mj_id: i32,
    pub created_by: i32,
}

/// 캠페인 부분 업데이트 입력.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCampaign {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre: Option<CampaignGenre>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub notes_url: Option<String>,
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default)]
    pub mj_id: Option<i32>,
}

impl UpdateCampaign {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    ///
    /// `updated_at`은 SQL의 `NOW()`가 항상 갱신하므로 여기서는
    /// 건드리지 않습니다.
    pub fn merge(self, existing: &CampaignRecord) -> CampaignRecord {
        CampaignRecord {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            genre: self.genre.unwrap_or(existing.genre),
            description: self.description.or_else(|| existing.description.clone()),
            map_url: self.map_url.or_else(|| existing.map_url.clone()),
            notes_url: self.notes_url.or_else(|| existing.notes_url.clone()),
            status: self.status.unwrap_or(existing.status),
            sessions_count: existing.sessions_count,
            created_by: existing.created_by,
            mj_id: self.mj_id.unwrap_or(existing.mj_id),
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Campaign Repository.
pub struct CampaignRepository;

impl CampaignRepository {
    /// ID로 캠페인 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<CampaignRecord>, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecord>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 캠페인 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<CampaignRecord>, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecord>(
            "SELECT * FROM campaigns ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// 캠페인 생성.
    pub async fn create(pool: &PgPool, input: NewCampaign) -> Result<CampaignRecord, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecord>(
            r#"
            INSERT INTO campaigns (name, genre, description, map_url, notes_url, status, mj_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(input.genre)
        .bind(&input.description)
        .bind(&input.map_url)
        .bind(&input.notes_url)
        .bind(input.status)
        .bind(input.mj_id)
        .bind(input.created_by)
        .fetch_one(pool)
        .await
    }

    /// 캠페인 부분 업데이트.
    ///
    /// 빈 업데이트라도 `updated_at`은 갱신됩니다.
    pub async fn update(
        pool: &PgPool,
        existing: &CampaignRecord,
        input: UpdateCampaign,
    ) -> Result<CampaignRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, CampaignRecord>(
            r#"
            UPDATE campaigns
            SET name = $2, genre = $3, description = $4, map_url = $5,
                notes_url = $6, status = $7, mj_id = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(&merged.name)
        .bind(merged.genre)
        .bind(&merged.description)
        .bind(&merged.map_url)
        .bind(&merged.notes_url)
        .bind(merged.status)
        .bind(merged.mj_id)
        .fetch_one(pool)
        .await
    }

    /// 캠페인 삭제 (hard delete).
    ///
    /// 소속 세션과 그 대사, 연관 테이블 행은 FK CASCADE로 함께
    /// 제거됩니다. 플레이어/NPC 자체는 남습니다.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<CampaignRecord>, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecord>("DELETE FROM campaigns WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Associations (멱등: 중복 추가/부재 제거는 no-op)
    // ============================================================================================

    /// 캠페인에 플레이어 추가.
    pub async fn add_player(
        pool: &PgPool,
        campaign_id: i32,
        player_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO campaign_players (campaign_id, player_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(campaign_id)
        .bind(player_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 캠페인에서 플레이어 제거.
    pub async fn remove_player(
        pool: &PgPool,
        campaign_id: i32,
        player_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM campaign_players WHERE campaign_id = $1 AND player_id = $2",
        )
        .bind(campaign_id)
        .bind(player_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 캠페인에 NPC 추가.
    pub async fn add_npc(pool: &PgPool, campaign_id: i32, npc_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO campaign_npcs (campaign_id, npc_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(campaign_id)
        .bind(npc_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 캠페인에서 NPC 제거.
    pub async fn remove_npc(
        pool: &PgPool,
        campaign_id: i32,
        npc_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaign_npcs WHERE campaign_id = $1 AND npc_id = $2")
            .bind(campaign_id)
            .bind(npc_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 캠페인 접근 사용자 추가.
    pub async fn add_user(
        pool: &PgPool,
        campaign_id: i32,
        user_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO campaign_users (campaign_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(campaign_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 캠페인 접근 사용자 제거.
    pub async fn remove_user(
        pool: &PgPool,
        campaign_id: i32,
        user_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaign_users WHERE campaign_id = $1 AND user_id = $2")
            .bind(campaign_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================================================================
    // Projections
    // ============================================================================================

    /// 캠페인 소속 플레이어 ID 목록.
    pub async fn player_ids(pool: &PgPool, campaign_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT player_id FROM campaign_players WHERE campaign_id = $1 ORDER BY player_id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// 캠페인 소속 NPC ID 목록.
    pub async fn npc_ids(pool: &PgPool, campaign_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT npc_id FROM campaign_npcs WHERE campaign_id = $1 ORDER BY npc_id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// 캠페인 접근 사용자 ID 목록.
    pub async fn authorized_user_ids(
        pool: &PgPool,
        campaign_id: i32,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM campaign_users WHERE campaign_id = $1 ORDER BY user_id",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_campaign() -> CampaignRecord {
        CampaignRecord {
            id: 10,
            name: "Lost Mines".to_string(),
            genre: CampaignGenre::Fantasy,
            description: Some("intro adventure".to_string()),
            map_url: None,
            notes_url: None,
            status: CampaignStatus::InProgress,
            sessions_count: 3,
            created_by: 1,
            mj_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_campaign();
        let merged = UpdateCampaign::default().merge(&existing);

        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.genre, existing.genre);
        assert_eq!(merged.description, existing.description);
        assert_eq!(merged.status, existing.status);
        assert_eq!(merged.sessions_count, existing.sessions_count);
        assert_eq!(merged.mj_id, existing.mj_id);
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let existing = sample_campaign();
        let update = UpdateCampaign {
            status: Some(CampaignStatus::Completed),
            notes_url: Some("https://notes.example/1".to_string()),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.status, CampaignStatus::Completed);
        assert_eq!(merged.notes_url.as_deref(), Some("https://notes.example/1"));
        assert_eq!(merged.name, "Lost Mines");
        assert_eq!(merged.genre, CampaignGenre::Fantasy);
    }

    #[test]
    fn test_merge_never_touches_counters_or_creator() {
        let existing = sample_campaign();
        let update = UpdateCampaign {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.sessions_count, 3);
        assert_eq!(merged.created_by, 1);
    }

    #[test]
    fn test_new_campaign_defaults() {
        let input: NewCampaign = serde_json::from_str(
            r#"{"name": "Lost Mines", "mj_id": 1, "created_by": 1}"#,
        )
        .unwrap();

        assert_eq!(input.genre, CampaignGenre::Other);
        assert_eq!(input.status, CampaignStatus::InProgress);
        assert!(input.description.is_none());
    }
}
