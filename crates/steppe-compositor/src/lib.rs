pub mod compositor;
pub mod error;
pub mod terrain;

pub use compositor::Compositor;
pub use error::CompositeError;
pub use terrain::TerrainGenerator;
