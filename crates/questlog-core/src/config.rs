//! 환경변수 기반 설정 모듈.
//!
//! 설정은 프로세스 시작 시 `Settings::from_env()`로 한 번만 로드되어
//! `AppState`를 통해 각 컴포넌트에 주입됩니다. 전역 싱글턴을 두지
//! 않습니다.

use serde::Deserialize;
use thiserror::Error;

/// 설정 로드 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("필수 환경변수가 설정되지 않았습니다: {0}")]
    MissingVar(&'static str),
    #[error("환경변수 값 파싱 실패: {name}={value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 애플리케이션 전체 설정.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP 서버 설정
    pub server: ServerSettings,
    /// 데이터베이스 설정
    pub database: DatabaseSettings,
    /// 인증/토큰 설정
    pub auth: AuthSettings,
    /// 오디오 업로드용 오브젝트 스토리지 설정
    pub media: MediaSettings,
}

/// HTTP 서버 설정.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// PostgreSQL 연결 URL
    pub url: String,
    /// 커넥션 풀 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

/// 인증/토큰 설정.
///
/// 서명 키와 알고리즘(HS256 고정)은 프로세스 전역 설정이며,
/// 시작 시 한 번 로드됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// Access Token 만료 시간 (분)
    pub token_expire_minutes: i64,
}

/// 오브젝트 스토리지 설정.
///
/// 세션 오디오 파일 업로드에 사용됩니다. 미설정 시 업로드
/// 엔드포인트는 설정 누락 에러를 반환합니다.
#[derive(Debug, Clone, Default)]
pub struct MediaSettings {
    /// 업로드 엔드포인트 URL
    pub upload_url: Option<String>,
    /// 업로드 API 키
    pub api_key: Option<String>,
}

impl Settings {
    /// 환경변수에서 설정 로드.
    ///
    /// `.env` 파일이 있으면 먼저 읽습니다. `DATABASE_URL`과
    /// `JWT_SECRET`은 필수입니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        Ok(Self {
            server: ServerSettings {
                host: std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_var_parse("API_PORT", 3000)?,
            },
            database: DatabaseSettings {
                url,
                max_connections: env_var_parse("DB_MAX_CONNECTIONS", 10)?,
                connect_timeout_secs: env_var_parse("DB_CONNECT_TIMEOUT_SECS", 30)?,
            },
            auth: AuthSettings {
                jwt_secret,
                token_expire_minutes: env_var_parse("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
            },
            media: MediaSettings {
                upload_url: std::env::var("MEDIA_UPLOAD_URL").ok(),
                api_key: std::env::var("MEDIA_API_KEY").ok(),
            },
        })
    }
}

/// 환경변수를 파싱하고, 없으면 기본값을 반환합니다.
///
/// 값이 존재하지만 파싱에 실패하면 조용히 기본값으로 넘어가지
/// 않고 에러를 반환합니다.
fn env_var_parse<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parse_default() {
        let port: u16 = env_var_parse("QUESTLOG_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_env_var_parse_invalid() {
        std::env::set_var("QUESTLOG_TEST_BAD_PORT", "not-a-number");
        let result: Result<u16, _> = env_var_parse("QUESTLOG_TEST_BAD_PORT", 3000);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        std::env::remove_var("QUESTLOG_TEST_BAD_PORT");
    }

    #[test]
    fn test_server_settings_default() {
        let settings = ServerSettings::default();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 3000);
    }
}
