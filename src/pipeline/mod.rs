//! Pipeline components: channels and context, walk, upload coordinator, completion monitor.
//! Walk → pair channel → coordinator → error channel → monitor.

pub mod context;
pub mod coordinator;
pub mod monitor;
pub mod walk;

pub use context::{PipelineChannels, PipelineContext, create_pipeline_channels};
pub use coordinator::{spawn_upload_coordinator, upload_many};
pub use monitor::{Monitor, MonitorState, monitor_errors, run_batch};
pub use walk::{WalkOutcome, WalkReport, run_walk_loop, spawn_walk_thread, to_outcome_walkdir};
