//! Grid raycaster: DDA traversal of a tile map from a camera with a view
//! plane, one ray per screen column, plus the drawing helpers the viewer uses.

pub mod camera;
pub mod config;
pub mod error;
pub mod map;
pub mod raycaster;
pub mod renderer;
pub mod scaler;
pub mod vec2;

pub use camera::Camera;
pub use error::{CastError, Result};
pub use map::TileMap;
pub use raycaster::{RayHit, Side, cast_column, cast_rays};
pub use vec2::Vec2;
