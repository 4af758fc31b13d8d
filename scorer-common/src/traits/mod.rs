// src/traits/mod.rs

pub mod app_traits;
pub mod storage_traits;

pub use app_traits::{JobScheduler, SettingsProvider};
pub use storage_traits::KvStore;
