//! Core CPU path-tracing engine: geometry, materials, scene assembly, and the concurrent
//! renderer. The `cli` crate is a thin terminal harness built on top of this library.

pub mod camera;
pub mod color;
pub mod error;
pub mod integrator;
pub mod material;
pub mod math;
pub mod mesh;
pub mod object;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod transform;

pub use camera::{Camera, CameraConfig};
pub use color::Color;
pub use error::{EngineError, EngineResult};
pub use integrator::PathIntegrator;
pub use material::{DebugMode, Material};
pub use math::{BoundingBox, Mat4, Point3, Ray, Vec3};
pub use mesh::{Mesh, Triangle, Vertex};
pub use object::{Object, Shape, SurfaceHit};
pub use renderer::Renderer;
pub use scene::Scene;
pub use texture::{Interpolation, Texture};
pub use transform::Transform;
