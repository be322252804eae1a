pub mod geo;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
