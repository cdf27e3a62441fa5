//! Type definitions

pub mod import;
pub mod job_centre;
pub mod messages;

pub use import::*;
pub use job_centre::*;
pub use messages::*;
