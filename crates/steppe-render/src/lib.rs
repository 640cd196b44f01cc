pub mod error;
pub mod raster;
pub mod renderer;
pub mod settings;
pub mod sky;
pub mod smooth;
pub mod sprite;
pub mod tables;

#[cfg(test)]
mod test_harness;

pub use error::RenderError;
pub use raster::TraversalMode;
pub use renderer::Renderer;
pub use settings::{load_settings, load_settings_from_str, SettingsError};
pub use sprite::{Sprite, VisibleSprite};
pub use tables::LookupTables;
