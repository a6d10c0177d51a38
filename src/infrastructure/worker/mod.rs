// Background worker: wire types, the worker side and the caller side
pub mod client;
pub mod host;
pub mod protocol;

pub use client::*;
pub use host::*;
pub use protocol::*;
