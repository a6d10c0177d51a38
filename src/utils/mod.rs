// Shared utilities module
pub mod config_loader;
pub mod errors;
pub mod logging;
pub mod profiler;
pub mod ui;
pub mod watch;

pub use config_loader::*;
pub use errors::*;
pub use logging::*;
pub use profiler::*;
pub use ui::*;
pub use watch::*;
