// scorer-core/src/tasks/mod.rs

pub mod scheduler;

pub use scheduler::{spawn_job_dispatcher, ScheduledJob, TokioJobScheduler};
