//! Worker Layer - Background Task Processing
//!
//! 实现 InterruptionWorker，按顺序处理平台投递的中断通知

mod interruption_worker;

pub use interruption_worker::{interruption_channel, InterruptionSink, InterruptionWorker};
