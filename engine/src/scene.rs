//! A scene: a background, a camera, and the objects in between, plus the integrator knobs
//! (ray depth, sample count, direct-lighting toggle) that travel with it.

use crate::camera::Camera;
use crate::error::{EngineError, EngineResult};
use crate::math::{Ray, Vec3};
use crate::object::{Object, SurfaceHit};
use crate::texture::Texture;

/// A fully-specified scene, ready to hand to [`crate::renderer::Renderer::set_scene`].
pub struct Scene {
    pub background: Texture,
    pub camera: Camera,
    pub objects: Vec<Object>,
    pub max_ray_depth: u32,
    pub samples_per_pixel: u32,
    /// When `false`, the integrator returns a flat normal-shaded preview instead of tracing
    /// bounces — see [`crate::integrator::PathIntegrator`].
    pub lighting_enabled: bool,
}

impl Scene {
    /// Validates the scene's integrator parameters. Objects are not otherwise inspected — an
    /// empty scene (miss on every ray) is valid, per [`crate::integrator`]'s background path.
    pub fn validate(
        camera: Camera,
        background: Texture,
        objects: Vec<Object>,
        max_ray_depth: u32,
        samples_per_pixel: u32,
        lighting_enabled: bool,
    ) -> EngineResult<Self> {
        if max_ray_depth == 0 {
            return Err(EngineError::invalid_argument(
                "max_ray_depth must be at least 1",
            ));
        }
        if samples_per_pixel == 0 {
            return Err(EngineError::invalid_argument(
                "samples_per_pixel must be at least 1",
            ));
        }
        Ok(Self {
            background,
            camera,
            objects,
            max_ray_depth,
            samples_per_pixel,
            lighting_enabled,
        })
    }

    /// Samples the background for a ray that missed every object, via an equirectangular
    /// projection of the ray's (unit) direction onto the background texture's `(u, v)`.
    pub fn sample_background(&self, ray: &Ray) -> crate::color::Color {
        use std::f64::consts::PI;
        let d = ray.direction;
        let u = 0.5 + d.z.atan2(d.x) / (2.0 * PI);
        let v = 0.5 + d.y.asin() / PI;
        self.background.sample(u, v)
    }

    /// Finds the closest object hit along `ray`, ties broken by first occurrence in
    /// [`Scene::objects`] (matching the original scan order rather than a stable-but-arbitrary
    /// re-sort).
    pub fn closest_hit(&self, ray: &Ray) -> Option<(&Object, f64)> {
        let mut closest: Option<(&Object, f64)> = None;
        for object in &self.objects {
            if let Some(distance) = object.intersect(ray) {
                if closest.map_or(true, |(_, best)| distance < best) {
                    closest = Some((object, distance));
                }
            }
        }
        closest
    }

    /// Convenience combining [`Scene::closest_hit`] and [`Object::surface_at`].
    pub fn trace_closest(&self, ray: &Ray) -> Option<(&Object, SurfaceHit)> {
        let (object, distance) = self.closest_hit(ray)?;
        Some((object, object.surface_at(ray, distance)))
    }
}

/// `+Y`, the convention every scene preset and the CLI default the camera's `orientation` to
/// when the caller has no stronger opinion.
pub const DEFAULT_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);
