// src/exec/mod.rs

//! Step execution layer.
//!
//! A step "runs" by waiting out its duration. This module turns a started
//! step into a timer that reports back through the completion queue.
//!
//! - [`backend`] provides the `TimerBackend` trait and the production
//!   `TokioTimerBackend`, which tests can replace with a fake.
//! - [`timer_task`] is the body of one timer task.

pub mod backend;
pub mod timer_task;

pub use backend::{TimerBackend, TimerHandle, TokioTimerBackend};
