//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용하며 `&PgPool`을
//! 받습니다. 부분 업데이트는 엔티티별 명시적 merge 함수로
//! 처리합니다 (리플렉션 없음).

pub mod campaigns;
pub mod dialogs;
pub mod npcs;
pub mod players;
pub mod sessions;
pub mod users;

pub use campaigns::{CampaignRecord, CampaignRepository, NewCampaign, UpdateCampaign};
pub use dialogs::{DialogRecord, DialogRepository, NewDialog, UpdateDialog};
pub use npcs::{NewNpc, NpcRecord, NpcRepository, UpdateNpc};
pub use players::{NewPlayer, PlayerRecord, PlayerRepository, UpdatePlayer};
pub use sessions::{NewSession, SessionRecord, SessionRepository, UpdateSession};
pub use users::{CreateUserError, NewUser, UpdateUser, UserRecord, UserRepository};
