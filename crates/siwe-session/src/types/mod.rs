/*
[INPUT]:  Protocol wire shapes and session configuration
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for session and clock communication
[UPDATE]: When wire shapes or configuration options change
*/

pub mod config;
pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use config::*;
pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;
