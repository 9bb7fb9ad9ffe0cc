pub mod auth;
pub mod envelope;
pub mod error;
pub mod notice;

pub use envelope::ApiEnvelope;
pub use error::AppError;
pub use notice::{Notice, NoticeLevel};
