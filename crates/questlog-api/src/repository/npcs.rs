//! NPC Repository
//!
//! 게임 마스터가 운용하는 NPC를 다룹니다. 플레이어와 달리 소유
//! 사용자와 HP 추적이 없습니다.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

// ================================================================================================
// Types
// ================================================================================================

/// NPC 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NpcRecord {
    pub id: i32,
    pub name: String,
    pub race: String,
    #[sqlx(default)]
    pub class_name: Option<String>,
    #[sqlx(default)]
    pub alignment: Option<String>,
    pub level: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    #[sqlx(default)]
    pub description: Option<String>,
}

fn default_level() -> i32 {
    1
}

fn default_ability() -> i32 {
    10
}

/// 새 NPC 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewNpc {
    pub name: String,
    pub race: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default = "default_ability")]
    pub strength: i32,
    #[serde(default = "default_ability")]
    pub dexterity: i32,
    #[serde(default = "default_ability")]
    pub constitution: i32,
    #[serde(default = "default_ability")]
    pub intelligence: i32,
    #[serde(default = "default_ability")]
    pub wisdom: i32,
    #[serde(default = "default_ability")]
    pub charisma: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// NPC 부분 업데이트 입력.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateNpc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub strength: Option<i32>,
    #[serde(default)]
    pub dexterity: Option<i32>,
    #[serde(default)]
    pub constitution: Option<i32>,
    #[serde(default)]
    pub intelligence: Option<i32>,
    #[serde(default)]
    pub wisdom: Option<i32>,
    #[serde(default)]
    pub charisma: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateNpc {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    pub fn merge(self, existing: &NpcRecord) -> NpcRecord {
        NpcRecord {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            race: self.race.unwrap_or_else(|| existing.race.clone()),
            class_name: self.class_name.or_else(|| existing.class_name.clone()),
            alignment: self.alignment.or_else(|| existing.alignment.clone()),
            level: self.level.unwrap_or(existing.level),
            strength: self.strength.unwrap_or(existing.strength),
            dexterity: self.dexterity.unwrap_or(existing.dexterity),
            constitution: self.constitution.unwrap_or(existing.constitution),
            intelligence: self.intelligence.unwrap_or(existing.intelligence),
            wisdom: self.wisdom.unwrap_or(existing.wisdom),
            charisma: self.charisma.unwrap_or(existing.charisma),
            description: self.description.or_else(|| existing.description.clone()),
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// NPC Repository.
pub struct NpcRepository;

impl NpcRepository {
    /// ID로 NPC 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<NpcRecord>, sqlx::Error> {
        sqlx::query_as::<_, NpcRecord>("SELECT * FROM npcs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// NPC 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<NpcRecord>, sqlx::Error> {
        sqlx::query_as::<_, NpcRecord>("SELECT * FROM npcs ORDER BY id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// NPC 생성.
    pub async fn create(pool: &PgPool, input: NewNpc) -> Result<NpcRecord, sqlx::Error> {
        sqlx::query_as::<_, NpcRecord>(
            r#"
            INSERT INTO npcs (
                name, race, class_name, alignment, level,
                strength, dexterity, constitution, intelligence, wisdom, charisma, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.race)
        .bind(&input.class_name)
        .bind(&input.alignment)
        .bind(input.level)
        .bind(input.strength)
        .bind(input.dexterity)
        .bind(input.constitution)
        .bind(input.intelligence)
        .bind(input.wisdom)
        .bind(input.charisma)
        .bind(&input.description)
        .fetch_one(pool)
        .await
    }

    /// NPC 부분 업데이트.
    pub async fn update(
        pool: &PgPool,
        existing: &NpcRecord,
        input: UpdateNpc,
    ) -> Result<NpcRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, NpcRecord>(
            r#"
            UPDATE npcs
            SET name = $2, race = $3, class_name = $4, alignment = $5, level = $6,
                strength = $7, dexterity = $8, constitution = $9,
                intelligence = $10, wisdom = $11, charisma = $12, description = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(&merged.name)
        .bind(&merged.race)
        .bind(&merged.class_name)
        .bind(&merged.alignment)
        .bind(merged.level)
        .bind(merged.strength)
        .bind(merged.dexterity)
        .bind(merged.constitution)
        .bind(merged.intelligence)
        .bind(merged.wisdom)
        .bind(merged.charisma)
        .bind(&merged.description)
        .fetch_one(pool)
        .await
    }

    /// NPC 삭제 (hard delete).
    ///
    /// 캠페인/세션 연관 행은 FK CASCADE로 함께 제거됩니다.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<NpcRecord>, sqlx::Error> {
        sqlx::query_as::<_, NpcRecord>("DELETE FROM npcs WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Projections
    // ============================================================================================

    /// NPC가 등장하는 캠페인 ID 목록.
    pub async fn campaign_ids(pool: &PgPool, npc_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT campaign_id FROM campaign_npcs WHERE npc_id = $1 ORDER BY campaign_id",
        )
        .bind(npc_id)
        .fetch_all(pool)
        .await
    }

    /// NPC가 등장한 세션 ID 목록.
    pub async fn session_ids(pool: &PgPool, npc_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT session_id FROM session_npcs WHERE npc_id = $1 ORDER BY session_id",
        )
        .bind(npc_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_npc() -> NpcRecord {
        NpcRecord {
            id: 3,
            name: "Gundren".to_string(),
            race: "Dwarf".to_string(),
            class_name: None,
            alignment: Some("NG".to_string()),
            level: 2,
            strength: 11,
            dexterity: 10,
            constitution: 12,
            intelligence: 14,
            wisdom: 13,
            charisma: 12,
            description: Some("quest giver".to_string()),
        }
    }

    #[test]
    fn test_new_npc_defaults() {
        let input: NewNpc =
            serde_json::from_str(r#"{"name": "Gundren", "race": "Dwarf"}"#).unwrap();

        assert_eq!(input.level, 1);
        assert_eq!(input.wisdom, 10);
        assert!(input.class_name.is_none());
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_npc();
        let merged = UpdateNpc::default().merge(&existing);

        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.class_name, existing.class_name);
        assert_eq!(merged.level, existing.level);
        assert_eq!(merged.description, existing.description);
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let existing = sample_npc();
        let update = UpdateNpc {
            class_name: Some("Rogue".to_string()),
            level: Some(3),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.class_name.as_deref(), Some("Rogue"));
        assert_eq!(merged.level, 3);
        assert_eq!(merged.name, "Gundren");
        assert_eq!(merged.alignment.as_deref(), Some("NG"));
    }
}
