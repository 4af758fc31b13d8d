// scorer-core/src/lib.rs

pub mod history;
pub mod platform;
pub mod scoring;
pub mod services;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod test_utils;

pub use scorer_common::error::Error;
pub use storage::UserScoreStore;
