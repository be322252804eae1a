//! Wire format for the facility search backend.
//!
//! This crate owns both directions of the contract:
//! - Viewport state → request body (aggregation vs. itemized, text filter,
//!   bounding-box filter)
//! - Response body → decoded results, split into a tagged union at the
//!   parse boundary so rendering code can match exhaustively
//!
//! Everything here is pure data transformation; no IO.

pub mod request;
pub mod response;
pub mod viewport;

pub use request::*;
pub use response::*;
pub use viewport::*;
