//! A CPU-only 3D renderer built around the painter's algorithm.
//!
//! Meshes are transformed into view space, culled, clipped against the near
//! plane, projected, clipped against the screen rectangle, lit, and finally
//! sorted back to front. The result is a list of screen-space triangles that
//! any 2D polygon fill can draw (see [`core::pipeline::Canvas`]).

pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use crate::core::geometry::{DEBUG_ID, Triangle, Vertex};
pub use crate::core::pipeline::{Canvas, LightEnvironment, Shader};
pub use crate::error::{Error, Result};
pub use crate::pipeline::renderer::{DepthSort, Frame, FrameStats, RenderSettings, Renderer};
pub use crate::scene::camera::Camera;
pub use crate::scene::light::Light;
pub use crate::scene::mesh::{Mesh, Shading};
pub use crate::scene::thing::Thing;
