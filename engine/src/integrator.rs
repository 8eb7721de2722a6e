//! Monte Carlo path tracing integrator solving the rendering equation:
//!   L_o(p, ω_o) = L_e(p, ω_o) + ∫_Ω f_r(p, ω_i, ω_o) · L_i(p, ω_i) · |cos θ_i| dω_i
//! via importance-sampling each material's BRDF at every bounce rather than numerically
//! integrating the hemisphere.

use crate::color::Color;
use crate::math::Ray;
use crate::scene::Scene;

/// Stateless driver for [`Scene::trace_closest`] and [`crate::material::Material::scatter`].
/// Holds no data of its own — every call is parameterized by the scene and ray it's given,
/// so a single integrator is shared across every worker thread in [`crate::renderer::Renderer`].
pub struct PathIntegrator;

impl PathIntegrator {
    /// Traces a single ray, recursing through scattered bounces until either `depth` reaches
    /// `max_depth`, the ray escapes to the background, or a material absorbs it outright.
    ///
    /// `max_depth` is passed explicitly rather than read from `scene.max_ray_depth` so
    /// [`crate::renderer::Renderer`]'s coarse-preview mode can override it per-render without
    /// mutating the (shared, read-only) scene.
    pub fn trace(scene: &Scene, ray: &Ray, max_depth: u32, depth: u32, rng: &mut dyn rand::RngCore) -> Color {
        if depth >= max_depth {
            return Color::zero();
        }

        let Some((object, hit)) = scene.trace_closest(ray) else {
            return scene.sample_background(ray);
        };

        if !scene.lighting_enabled {
            // Flat, bounce-free preview of the surface's own albedo/emission.
            return object.material.preview_color(hit.normal, hit.uv);
        }

        let emitted = object
            .material
            .emit(ray.direction, hit.position, hit.normal, hit.uv);

        match object
            .material
            .scatter(ray.direction, hit.position, hit.normal, hit.uv, rng)
        {
            Some((scattered, attenuation)) => {
                let incoming = Self::trace(scene, &scattered, max_depth, depth + 1, rng);
                emitted + attenuation * incoming
            }
            None => emitted,
        }
    }
}
