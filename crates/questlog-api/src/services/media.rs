//! 미디어 스토리지 클라이언트.
//!
//! 세션 녹음 파일을 외부 미디어 스토리지에 multipart/form-data로
//! 업로드하고 재생 가능한 URL을 돌려받습니다. 파일 자체는 DB에
//! 저장하지 않고 반환된 URL만 세션 레코드에 기록합니다.

use std::time::Duration;

use questlog_core::config::MediaSettings;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;

/// 미디어 업로드 에러
#[derive(Debug, Error)]
pub enum MediaError {
    /// MEDIA_UPLOAD_URL 미설정
    #[error("미디어 스토리지가 설정되지 않았습니다")]
    NotConfigured,

    #[error("업로드 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("업로드 응답 해석 실패: {0}")]
    BadResponse(String),
}

/// 미디어 스토리지 클라이언트.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    client: Client,
    settings: MediaSettings,
}

impl MediaStorage {
    /// 설정으로부터 클라이언트 생성.
    pub fn new(settings: MediaSettings) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, settings })
    }

    /// 업로드 가능 여부.
    pub fn is_configured(&self) -> bool {
        self.settings.upload_url.is_some()
    }

    /// 세션 녹음 업로드.
    ///
    /// 파일은 `sessions/{session_id}` 폴더에 저장되며 스토리지가
    /// 돌려준 재생 URL을 반환합니다. 응답 JSON에서 `secure_url`을
    /// 우선 사용하고 없으면 `url`로 폴백합니다.
    pub async fn upload_session_audio(
        &self,
        session_id: i32,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let upload_url = self
            .settings
            .upload_url
            .as_deref()
            .ok_or(MediaError::NotConfigured)?;

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| MediaError::BadResponse(e.to_string()))?;

        let mut form = Form::new()
            .text("folder", format!("sessions/{session_id}"))
            .part("file", part);

        if let Some(api_key) = &self.settings.api_key {
            form = form.text("api_key", api_key.clone());
        }

        let response = self
            .client
            .post(upload_url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;

        body.get("secure_url")
            .or_else(|| body.get("url"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                MediaError::BadResponse("응답에 secure_url/url 필드 없음".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_storage_rejects_upload() {
        let storage = MediaStorage::new(MediaSettings::default()).unwrap();
        assert!(!storage.is_configured());
    }

    #[tokio::test]
    async fn test_upload_without_url_is_not_configured() {
        let storage = MediaStorage::new(MediaSettings::default()).unwrap();
        let err = storage
            .upload_session_audio(1, "rec.mp3", "audio/mpeg", vec![0u8; 4])
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NotConfigured));
    }
}
