pub mod config;
pub mod events;
mod session;
pub mod state;

pub use config::{MonitorConfig, Sensitivity};
pub use events::{
    BaselineSource, DriftCheckEvent, FrameOutcome, MonitorEvent, PostureListener, SlouchEvent,
};
pub use session::SessionMonitor;
pub use state::{MonitorState, PostureState, SessionStats};
