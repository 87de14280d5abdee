//! Player Repository
//!
//! 플레이어 캐릭터 시트를 다룹니다. 능력치 6종은 기본값 10,
//! 레벨은 1, HP는 10.0에서 시작합니다.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

// ================================================================================================
// Types
// ================================================================================================

/// 플레이어 캐릭터 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlayerRecord {
    pub id: i32,
    pub name: String,
    pub race: String,
    pub class_name: String,
    #[sqlx(default)]
    pub background: Option<String>,
    #[sqlx(default)]
    pub alignment: Option<String>,
    pub level: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub current_hp: f64,
    pub max_hp: f64,
    #[sqlx(default)]
    pub skills: Option<String>,
    #[sqlx(default)]
    pub inventory: Option<String>,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 캐릭터를 소유한 사용자 (users.id)
    pub user_id: i32,
}

fn default_level() -> i32 {
    1
}

fn default_ability() -> i32 {
    10
}

fn default_hp() -> f64 {
    10.0
}

/// 새 플레이어 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewPlayer {
    pub name: String,
    pub race: String,
    pub class_name: String,
    #[serde(default)]
    pub background: Option<String>,
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
    #[serde(default = "default_hp")]
    pub current_hp: f64,
    #[serde(default = "default_hp")]
    pub max_hp: f64,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub inventory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: i32,
}

/// 플레이어 부분 업데이트 입력. `user_id`는 이전 불가.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePlayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
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
    pub current_hp: Option<f64>,
    #[serde(default)]
    pub max_hp: Option<f64>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub inventory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdatePlayer {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    pub fn merge(self, existing: &PlayerRecord) -> PlayerRecord {
        PlayerRecord {
            id: existing.id,
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            race: self.race.unwrap_or_else(|| existing.race.clone()),
            class_name: self.class_name.unwrap_or_else(|| existing.class_name.clone()),
            background: self.background.or_else(|| existing.background.clone()),
            alignment: self.alignment.or_else(|| existing.alignment.clone()),
            level: self.level.unwrap_or(existing.level),
            strength: self.strength.unwrap_or(existing.strength),
            dexterity: self.dexterity.unwrap_or(existing.dexterity),
            constitution: self.constitution.unwrap_or(existing.constitution),
            intelligence: self.intelligence.unwrap_or(existing.intelligence),
            wisdom: self.wisdom.unwrap_or(existing.wisdom),
            charisma: self.charisma.unwrap_or(existing.charisma),
            current_hp: self.current_hp.unwrap_or(existing.current_hp),
            max_hp: self.max_hp.unwrap_or(existing.max_hp),
            skills: self.skills.or_else(|| existing.skills.clone()),
            inventory: self.inventory.or_else(|| existing.inventory.clone()),
            description: self.description.or_else(|| existing.description.clone()),
            user_id: existing.user_id,
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// Player Repository.
pub struct PlayerRepository;

impl PlayerRepository {
    /// ID로 플레이어 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>("SELECT * FROM players WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 플레이어 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>("SELECT * FROM players ORDER BY id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// 특정 사용자가 소유한 플레이어 목록 조회.
    pub async fn list_by_user(pool: &PgPool, user_id: i32) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>("SELECT * FROM players WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// 플레이어 생성.
    pub async fn create(pool: &PgPool, input: NewPlayer) -> Result<PlayerRecord, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>(
            r#"
            INSERT INTO players (
                name, race, class_name, background, alignment, level,
                strength, dexterity, constitution, intelligence, wisdom, charisma,
                current_hp, max_hp, skills, inventory, description, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.race)
        .bind(&input.class_name)
        .bind(&input.background)
        .bind(&input.alignment)
        .bind(input.level)
        .bind(input.strength)
        .bind(input.dexterity)
        .bind(input.constitution)
        .bind(input.intelligence)
        .bind(input.wisdom)
        .bind(input.charisma)
        .bind(input.current_hp)
        .bind(input.max_hp)
        .bind(&input.skills)
        .bind(&input.inventory)
        .bind(&input.description)
        .bind(input.user_id)
        .fetch_one(pool)
        .await
    }

    /// 플레이어 부분 업데이트.
    pub async fn update(
        pool: &PgPool,
        existing: &PlayerRecord,
        input: UpdatePlayer,
    ) -> Result<PlayerRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, PlayerRecord>(
            r#"
            UPDATE players
            SET name = $2, race = $3, class_name = $4, background = $5, alignment = $6,
                level = $7, strength = $8, dexterity = $9, constitution = $10,
                intelligence = $11, wisdom = $12, charisma = $13,
                current_hp = $14, max_hp = $15, skills = $16, inventory = $17, description = $18
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(&merged.name)
        .bind(&merged.race)
        .bind(&merged.class_name)
        .bind(&merged.background)
        .bind(&merged.alignment)
        .bind(merged.level)
        .bind(merged.strength)
        .bind(merged.dexterity)
        .bind(merged.constitution)
        .bind(merged.intelligence)
        .bind(merged.wisdom)
        .bind(merged.charisma)
        .bind(merged.current_hp)
        .bind(merged.max_hp)
        .bind(&merged.skills)
        .bind(&merged.inventory)
        .bind(&merged.description)
        .fetch_one(pool)
        .await
    }

    /// 플레이어 삭제 (hard delete).
    ///
    /// 캠페인/세션 연관 행은 FK CASCADE로 함께 제거됩니다.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<PlayerRecord>, sqlx::Error> {
        sqlx::query_as::<_, PlayerRecord>("DELETE FROM players WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Projections
    // ============================================================================================

    /// 플레이어가 소속된 캠페인 ID 목록.
    pub async fn campaign_ids(pool: &PgPool, player_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT campaign_id FROM campaign_players WHERE player_id = $1 ORDER BY campaign_id",
        )
        .bind(player_id)
        .fetch_all(pool)
        .await
    }

    /// 플레이어가 참여한 세션 ID 목록.
    pub async fn session_ids(pool: &PgPool, player_id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT session_id FROM session_players WHERE player_id = $1 ORDER BY session_id",
        )
        .bind(player_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> PlayerRecord {
        PlayerRecord {
            id: 5,
            name: "Thorin".to_string(),
            race: "Dwarf".to_string(),
            class_name: "Fighter".to_string(),
            background: Some("Soldier".to_string()),
            alignment: Some("LG".to_string()),
            level: 4,
            strength: 16,
            dexterity: 12,
            constitution: 15,
            intelligence: 10,
            wisdom: 11,
            charisma: 8,
            current_hp: 31.0,
            max_hp: 40.0,
            skills: Some("Athletics, Intimidation".to_string()),
            inventory: Some("warhammer, shield".to_string()),
            description: None,
            user_id: 1,
        }
    }

    #[test]
    fn test_new_player_defaults() {
        let input: NewPlayer = serde_json::from_str(
            r#"{"name": "Thorin", "race": "Dwarf", "class_name": "Fighter", "user_id": 1}"#,
        )
        .unwrap();

        assert_eq!(input.level, 1);
        assert_eq!(input.strength, 10);
        assert_eq!(input.charisma, 10);
        assert_eq!(input.current_hp, 10.0);
        assert_eq!(input.max_hp, 10.0);
        assert!(input.background.is_none());
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_player();
        let merged = UpdatePlayer::default().merge(&existing);

        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.level, existing.level);
        assert_eq!(merged.current_hp, existing.current_hp);
        assert_eq!(merged.skills, existing.skills);
        assert_eq!(merged.user_id, existing.user_id);
    }

    #[test]
    fn test_merge_cannot_change_owner() {
        let existing = sample_player();
        let update = UpdatePlayer {
            level: Some(5),
            current_hp: Some(40.0),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.level, 5);
        assert_eq!(merged.current_hp, 40.0);
        assert_eq!(merged.user_id, 1);
        assert_eq!(merged.strength, 16);
    }
}
