//! 엔티티 공통 도메인 열거형.
//!
//! 저장소와 API 양쪽에서 공유되는 열거형을 정의합니다.
//! DB에는 snake_case 문자열(TEXT)로 저장됩니다.

mod campaign;
mod role;

pub use campaign::{CampaignGenre, CampaignStatus};
pub use role::UserRole;
