//! Query-cycle orchestration for the density map.
//!
//! The library is sans-IO: the host observes map events through
//! [`ViewportTracker`], asks [`MapSession`] for a request body when the map
//! settles, performs the network call itself, and feeds the outcome back
//! through [`MapSession::complete`]. Ordering across overlapping cycles is
//! handled with monotonic [`CycleId`]s; a response older than what is
//! already on screen is discarded.

pub mod session;
pub mod tracker;

pub use session::*;
pub use tracker::*;
