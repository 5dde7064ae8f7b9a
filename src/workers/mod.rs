pub mod elapsed_timer;
pub mod refresh_scheduler;

pub use elapsed_timer::{format_elapsed, ElapsedClocks, ElapsedTimer};
pub use refresh_scheduler::{CycleReceiver, RefreshScheduler, SchedulerHandle};
