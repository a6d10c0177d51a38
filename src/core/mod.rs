// Core domain layer
pub mod content;
pub mod engine;
pub mod interfaces;
pub mod models;

pub use content::*;
pub use interfaces::*;
pub use models::*;
