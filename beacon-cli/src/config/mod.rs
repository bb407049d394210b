mod layers;
mod loader;
mod types;

pub use layers::Layer;
pub use loader::{ConfigLoader, IdOrigin};
