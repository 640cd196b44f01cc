pub mod config;
pub mod constants;
pub mod error;
pub mod heightmap;
pub mod image;
pub mod math;
pub mod types;

pub use config::{FogSettings, ReflectionSettings, RenderSettings};
pub use error::SteppeError;
pub use heightmap::{heightmap_index, in_primary_tile, wrap_coordinate, Heightmap};
pub use image::Image;
pub use math::alpha_blend;
pub use types::{Camera, CameraUpdate, Capability, Color, Quality};
