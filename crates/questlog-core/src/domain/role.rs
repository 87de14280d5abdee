//! 사용자 역할.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 역할 간 상하 관계는 없습니다. 권한 검사는 요구 역할과의
/// 단순 동등 비교로만 이루어집니다 (admin이라도 user 전용
/// 라우트에는 접근할 수 없음).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx-support", sqlx(rename_all = "lowercase"))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// 관리자 - 사용자 관리 라우트 접근
    Admin,
    /// 일반 사용자 (기본값)
    #[default]
    User,
    /// 게스트 - 읽기 전용 초대 계정
    Guest,
}

impl UserRole {
    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            "guest" => Some(UserRole::Guest),
            _ => None,
        }
    }

    /// DB/토큰에 저장되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("USER"), Some(UserRole::User));
        assert_eq!(UserRole::parse("Guest"), Some(UserRole::Guest));
        assert_eq!(UserRole::parse("wizard"), None);
    }

    #[test]
    fn test_role_default() {
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: UserRole = serde_json::from_str("\"guest\"").unwrap();
        assert_eq!(parsed, UserRole::Guest);
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [UserRole::Admin, UserRole::User, UserRole::Guest] {
            assert_eq!(UserRole::parse(&role.to_string()), Some(role));
        }
    }
}
