//! Fare monitor: configuration, tracked state, alert delivery and the polling loop

pub mod config;
pub mod notifier;
pub mod scheduler;
pub mod state;

pub use config::{ConfigError, MonitorConfig, NotifyTarget};
pub use notifier::{NotificationChannel, Notifier, NotifierError};
pub use scheduler::{AlertOutcome, CycleOutcome, Scheduler, SchedulerHandle, SchedulerState};
pub use state::TrackerState;
