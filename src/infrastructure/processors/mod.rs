// Processors module
pub mod backend;
pub mod css_processor;
pub mod fallback;
pub mod html_processor;
pub mod js_processor;

pub use backend::*;
pub use css_processor::*;
pub use fallback::*;
pub use html_processor::*;
pub use js_processor::*;
