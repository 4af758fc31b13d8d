// src/models/mod.rs

pub mod event;
pub mod report;
pub mod settings;
pub mod user;

pub use event::{CommentInfo, CommentSubmitEvent, DelayedModActionPayload, ModActionEvent, ModActionKind, UserInfo};
pub use report::{Histogram, HistogramBin};
pub use settings::AppSettings;
pub use user::{UserRecord, UserScore};
