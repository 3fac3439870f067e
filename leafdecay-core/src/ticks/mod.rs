//! Tick based delayed task queue.
//!
//! Delays are measured in simulation ticks. Nothing blocks while waiting: the
//! host advances the clock and the owner polls for tasks that became due.
//!
//! - [`ScheduledTask`] - A single task with its trigger tick
//! - [`TaskQueue`] - Min-ordered queue of scheduled tasks

mod scheduled_task;
mod task_queue;

pub use scheduled_task::ScheduledTask;
pub use task_queue::TaskQueue;
