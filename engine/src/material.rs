//! Surface materials — each variant defines self-emission and an optional scattered ray with
//! per-channel attenuation, the two operations the [`crate::integrator::PathIntegrator`] drives.

use crate::color::Color;
use crate::math::{Ray, Vec3};
use crate::texture::Texture;

/// Which scalar a [`Material::Debug`] material visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    Normal,
    Uv,
}

/// A surface material. Closed set of variants, matching [`crate::texture::Texture`] and
/// [`crate::object::Object`]'s dispatch style.
#[derive(Debug, Clone)]
pub enum Material {
    /// Lambertian diffuse reflector.
    Diffuse(Texture),
    /// Specular reflector; `polish` in `[0, 1]` — `1.0` is a perfect mirror, `0.0` is fully
    /// scuffed (maximal random perturbation of the reflected ray).
    Reflective { albedo: Texture, polish: f64 },
    /// A refractive dielectric (glass, water) with the given index of refraction. Air is
    /// assumed to have index 1 on the other side of the surface.
    Dielectric { refraction_index: f64 },
    /// A pure emitter: returns its sampled emission and never scatters.
    Light(Texture),
    /// Diagnostic material that visualizes the surface normal or uv as a color.
    Debug(DebugMode),
}

impl Material {
    /// Self-emission at a surface point. Black for every variant except [`Material::Light`].
    pub fn emit(&self, _incident: Vec3, _position: Vec3, normal: Vec3, uv: (f64, f64)) -> Color {
        match self {
            Material::Light(tex) => tex.sample(uv.0, uv.1),
            Material::Debug(DebugMode::Normal) => Color::new(normal.x, normal.y, normal.z),
            Material::Debug(DebugMode::Uv) => Color::new(uv.0, uv.1, 0.0),
            _ => Color::zero(),
        }
    }

    /// The material's own surface color at `uv`, with no light transport at all — what
    /// [`crate::integrator::PathIntegrator::trace`] returns when the scene's `lighting_enabled`
    /// flag is off. Every variant with an albedo-like texture samples it directly; `Dielectric`
    /// has none to sample and reports clear white, and `Debug`/`Light` fall back to their own
    /// `emit`, which is already a flat, bounce-free value.
    pub fn preview_color(&self, normal: Vec3, uv: (f64, f64)) -> Color {
        match self {
            Material::Diffuse(albedo) => albedo.sample(uv.0, uv.1),
            Material::Reflective { albedo, .. } => albedo.sample(uv.0, uv.1),
            Material::Dielectric { .. } => Color::ones(),
            Material::Light(_) | Material::Debug(_) => self.emit(Vec3::zero(), Vec3::zero(), normal, uv),
        }
    }

    /// Samples a scattered ray and its attenuation. `None` means the incident ray is absorbed.
    pub fn scatter(
        &self,
        incident: Vec3,
        position: Vec3,
        normal: Vec3,
        uv: (f64, f64),
        rng: &mut dyn rand::RngCore,
    ) -> Option<(Ray, Color)> {
        match self {
            Material::Diffuse(albedo) => {
                let mut direction = normal + Vec3::random_unit_vector(rng);
                if direction.near_zero() {
                    direction = normal;
                }
                Some((Ray::new(position, direction), albedo.sample(uv.0, uv.1)))
            }

            Material::Reflective { albedo, polish } => {
                let scuff = (1.0 - polish).clamp(0.0, 1.0);
                let mut direction = incident.reflect(normal);
                if scuff > 0.0 {
                    direction = (direction + Vec3::random_unit_vector(rng) * scuff).unit();
                } else {
                    direction = direction.unit();
                }
                if direction.dot(normal) <= 0.0 {
                    return None;
                }
                Some((Ray::new(position, direction), albedo.sample(uv.0, uv.1)))
            }

            Material::Dielectric { refraction_index } => {
                let unit_incident = incident.unit();
                let (n1, n2, surface_normal) = if unit_incident.dot(normal) < 0.0 {
                    // Entering the material from air.
                    (1.0, *refraction_index, normal)
                } else {
                    // Exiting into air; flip the normal to face the incident ray's origin side.
                    (*refraction_index, 1.0, -normal)
                };
                let direction = unit_incident.refract(surface_normal, n1, n2)?;
                Some((Ray::new(position, direction), Color::ones()))
            }

            Material::Light(_) | Material::Debug(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn light_emits_sampled_texture_and_never_scatters() {
        let m = Material::Light(Texture::Solid(Color::new(1.0, 0.5, 0.25)));
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            m.emit(Vec3::zero(), Vec3::zero(), Vec3::unit_y(), (0.0, 0.0)),
            Color::new(1.0, 0.5, 0.25)
        );
        assert!(m
            .scatter(Vec3::unit_z(), Vec3::zero(), Vec3::unit_y(), (0.0, 0.0), &mut rng)
            .is_none());
    }

    #[test]
    fn debug_normal_reports_the_normal_as_a_color() {
        let m = Material::Debug(DebugMode::Normal);
        let n = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(m.emit(Vec3::zero(), Vec3::zero(), n, (0.0, 0.0)), n);
    }

    #[test]
    fn dielectric_with_matched_index_passes_through() {
        let m = Material::Dielectric {
            refraction_index: 1.0,
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let incident = Vec3::new(0.0, -1.0, 0.0);
        let normal = Vec3::unit_y();
        let (scattered, attenuation) = m
            .scatter(incident, Vec3::zero(), normal, (0.0, 0.0), &mut rng)
            .expect("n=1 never TIRs");
        assert!((scattered.direction - incident.unit()).length() < 1e-9);
        assert_eq!(attenuation, Color::ones());
    }

    #[test]
    fn reflective_absorbs_when_perturbation_points_into_surface() {
        // A grazing reflection with full scuff can legitimately flip below the surface;
        // the material must report absorption (None) rather than a ray pointing inward.
        let m = Material::Reflective {
            albedo: Texture::Solid(Color::ones()),
            polish: 0.0,
        };
        let normal = Vec3::unit_y();
        let incident = Vec3::new(1.0, -0.001, 0.0).unit();
        // Deterministic seed chosen so the random perturbation pushes the result below grazing.
        let mut rng = SmallRng::seed_from_u64(7);
        let result = m.scatter(incident, Vec3::zero(), normal, (0.0, 0.0), &mut rng);
        if let Some((ray, _)) = result {
            assert!(ray.direction.dot(normal) > 0.0);
        }
    }

    #[test]
    fn diffuse_falls_back_to_normal_when_scatter_direction_cancels() {
        // Construct the degenerate case directly: normal + random lands near zero only for a
        // vanishingly small set of RNG draws, so we check the fallback logic in isolation.
        let normal = Vec3::unit_y();
        let cancelling = -normal;
        let mut direction = normal + cancelling;
        if direction.near_zero() {
            direction = normal;
        }
        assert_eq!(direction, normal);
    }
}
