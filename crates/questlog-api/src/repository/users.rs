//! User Repository
//!
//! 사용자 관련 데이터베이스 연산을 담당합니다. 생성 시
//! username/email 유니크 선행 조건을 명시적으로 검사합니다.

use questlog_core::UserRole;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

use crate::error::ApiError;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// 저장된 비밀번호 해시 — 직렬화에서 제외
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub role: UserRole,
}

/// 새 사용자 입력 (비밀번호는 이미 해싱된 상태).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub role: UserRole,
}

/// 사용자 부분 업데이트 입력.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl UpdateUser {
    /// 기존 레코드 위에 존재하는 필드만 덮어쓴 레코드를 반환합니다.
    pub fn merge(self, existing: &UserRecord) -> UserRecord {
        UserRecord {
            id: existing.id,
            username: self.username.unwrap_or_else(|| existing.username.clone()),
            email: self.email.unwrap_or_else(|| existing.email.clone()),
            hashed_password: existing.hashed_password.clone(),
            is_active: self.is_active.unwrap_or(existing.is_active),
            is_superuser: self.is_superuser.unwrap_or(existing.is_superuser),
            role: self.role.unwrap_or(existing.role),
        }
    }
}

/// 사용자 생성 에러.
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    /// username 또는 email 충돌
    #[error("username 또는 email이 이미 사용 중입니다")]
    Duplicate,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<CreateUserError> for ApiError {
    fn from(e: CreateUserError) -> Self {
        match e {
            CreateUserError::Duplicate => ApiError::DuplicateEntity,
            CreateUserError::Database(e) => ApiError::Database(e),
        }
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository.
pub struct UserRepository;

impl UserRepository {
    /// ID로 사용자 조회.
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// username으로 사용자 조회.
    pub async fn get_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// email로 사용자 조회.
    pub async fn get_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// 사용자 목록 조회 (삽입 순서, 페이지네이션).
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY id OFFSET $1 LIMIT $2")
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// 사용자 생성.
    ///
    /// username 또는 email이 이미 존재하면 아무것도 저장하지 않고
    /// [`CreateUserError::Duplicate`]를 반환합니다. 동시 생성 경합은
    /// DB 유니크 제약이 잡아내며 같은 에러로 매핑됩니다.
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<UserRecord, CreateUserError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(&input.username)
        .bind(&input.email)
        .fetch_one(pool)
        .await?;

        if exists {
            return Err(CreateUserError::Duplicate);
        }

        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, email, hashed_password, is_active, is_superuser, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.hashed_password)
        .bind(input.is_active)
        .bind(input.is_superuser)
        .bind(input.role)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => CreateUserError::Duplicate,
            _ => CreateUserError::Database(e),
        })
    }

    /// 사용자 부분 업데이트.
    pub async fn update(
        pool: &PgPool,
        existing: &UserRecord,
        input: UpdateUser,
    ) -> Result<UserRecord, sqlx::Error> {
        let merged = input.merge(existing);

        sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET username = $2, email = $3, hashed_password = $4,
                is_active = $5, is_superuser = $6, role = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(merged.id)
        .bind(&merged.username)
        .bind(&merged.email)
        .bind(&merged.hashed_password)
        .bind(merged.is_active)
        .bind(merged.is_superuser)
        .bind(merged.role)
        .fetch_one(pool)
        .await
    }

    /// 저장된 비밀번호 해시 교체.
    pub async fn set_password_hash(
        pool: &PgPool,
        id: i32,
        hashed_password: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "UPDATE users SET hashed_password = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(hashed_password)
        .fetch_optional(pool)
        .await
    }

    /// 사용자 삭제 (hard delete).
    ///
    /// 소유한 플레이어와 캠페인 접근 연관 행은 FK CASCADE로 함께
    /// 제거됩니다. 삭제된 레코드를 반환하며, 없으면 None.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ============================================================================================
    // Projections (API 경계에서 연관 목록을 ID 목록으로 직렬화)
    // ============================================================================================

    /// 이 사용자가 생성한 캠페인 ID 목록.
    pub async fn created_campaign_ids(pool: &PgPool, id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM campaigns WHERE created_by = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    /// 이 사용자가 게임 마스터인 캠페인 ID 목록.
    pub async fn mj_campaign_ids(pool: &PgPool, id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM campaigns WHERE mj_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await
    }

    /// 이 사용자가 접근 가능한 캠페인 ID 목록 (campaign_users).
    pub async fn accessible_campaign_ids(pool: &PgPool, id: i32) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT campaign_id FROM campaign_users WHERE user_id = $1 ORDER BY campaign_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: 1,
            username: "dm1".to_string(),
            email: "dm1@x.com".to_string(),
            hashed_password: "$argon2id$...".to_string(),
            is_active: true,
            is_superuser: false,
            role: UserRole::User,
        }
    }

    #[test]
    fn test_empty_update_is_identity() {
        let existing = sample_user();
        let merged = UpdateUser::default().merge(&existing);

        assert_eq!(merged.username, existing.username);
        assert_eq!(merged.email, existing.email);
        assert_eq!(merged.hashed_password, existing.hashed_password);
        assert_eq!(merged.is_active, existing.is_active);
        assert_eq!(merged.role, existing.role);
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let existing = sample_user();
        let update = UpdateUser {
            email: Some("new@x.com".to_string()),
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let merged = update.merge(&existing);

        assert_eq!(merged.email, "new@x.com");
        assert_eq!(merged.role, UserRole::Admin);
        // 나머지는 그대로
        assert_eq!(merged.username, "dm1");
        assert!(merged.is_active);
    }

    #[test]
    fn test_hashed_password_not_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("argon2id"));
    }
}
