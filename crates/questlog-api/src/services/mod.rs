//! 외부 연동 서비스.

pub mod media;

pub use media::{MediaError, MediaStorage};
