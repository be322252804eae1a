pub mod renderer;
pub mod style;
pub mod surface;

pub use renderer::*;
pub use style::*;
pub use surface::*;
