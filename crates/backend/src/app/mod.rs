mod frame_input;
mod loop_runner;
mod metrics;
mod rendering;

pub use loop_runner::{run_host, run_host_with_stats, AppError, LoopConfig};
pub use metrics::{FrameStatsHandle, FrameStatsSnapshot};
pub use rendering::Renderer;
