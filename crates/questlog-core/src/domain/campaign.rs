//! 캠페인 장르 및 진행 상태.

use serde::{Deserialize, Serialize};

/// 캠페인 장르.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "snake_case"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CampaignGenre {
    Fantasy,
    SciFi,
    Horror,
    PostApo,
    Cthulhu,
    /// 기타 (기본값)
    #[default]
    Other,
}

impl std::fmt::Display for CampaignGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CampaignGenre::Fantasy => "fantasy",
            CampaignGenre::SciFi => "sci_fi",
            CampaignGenre::Horror => "horror",
            CampaignGenre::PostApo => "post_apo",
            CampaignGenre::Cthulhu => "cthulhu",
            CampaignGenre::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// 캠페인 진행 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "snake_case"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// 진행 중 (기본값)
    #[default]
    InProgress,
    /// 완결
    Completed,
    /// 보관됨
    Archived,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CampaignStatus::InProgress => "in_progress",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Archived => "archived",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_default() {
        assert_eq!(CampaignGenre::default(), CampaignGenre::Other);
    }

    #[test]
    fn test_genre_serialization() {
        assert_eq!(
            serde_json::to_string(&CampaignGenre::SciFi).unwrap(),
            "\"sci_fi\""
        );
        let parsed: CampaignGenre = serde_json::from_str("\"post_apo\"").unwrap();
        assert_eq!(parsed, CampaignGenre::PostApo);
    }

    #[test]
    fn test_status_default() {
        assert_eq!(CampaignStatus::default(), CampaignStatus::InProgress);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: CampaignStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, CampaignStatus::Archived);
    }
}
