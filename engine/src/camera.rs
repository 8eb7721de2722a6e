//! A thin-lens camera model with configurable field of view, aspect ratio, focus distance, and
//! aperture size. The camera builds an orthonormal basis `(u, v, w)` from its look-at
//! parameters, then maps normalized film-plane coordinates to primary rays.
//!
//! Depth of field is simulated by jittering the ray origin across a disk of radius
//! `aperture / 2` centered at the camera position while keeping the focal point fixed, which
//! produces the blur expected of objects away from the focus distance.

use crate::math::{Point3, Ray, Vec3};

/// Camera placement and lens parameters. `orientation` is always required — the engine has no
/// opinion about which way is "up" for a scene, only presets and the CLI default it to `+Y`.
pub struct CameraConfig {
    pub position: Point3,
    pub target: Point3,
    pub orientation: Vec3,
    pub vertical_fov_degrees: f64,
    pub aspect_ratio: f64,
    pub aperture: f64,
    pub focus_distance: f64,
}

pub struct Camera {
    origin: Point3,
    lower_left: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Constructs the camera from configuration. The orthonormal basis is:
    ///   w = unit(position - target)   (points backward, away from the scene)
    ///   u = unit(orientation × w)     (points right)
    ///   v = w × u                     (points up, orthogonal to both)
    pub fn new(config: &CameraConfig) -> Self {
        let theta = config.vertical_fov_degrees.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        let w = (config.position - config.target).unit();
        let u = config.orientation.cross(w).unit();
        let v = w.cross(u);

        let horizontal = u * viewport_width * config.focus_distance;
        let vertical = v * viewport_height * config.focus_distance;
        let lower_left =
            config.position - horizontal / 2.0 - vertical / 2.0 - w * config.focus_distance;

        Camera {
            origin: config.position,
            lower_left,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: config.aperture / 2.0,
        }
    }

    /// Generates a primary ray for normalized film-plane coordinates `(s, t) ∈ [0, 1]²`.
    /// When `lens_radius > 0` the ray origin is perturbed for depth-of-field.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn rand::RngCore) -> Ray {
        let rd = Vec3::random_in_unit_disk(rng) * self.lens_radius;
        let offset = self.u * rd.x + self.v * rd.y;
        Ray::new(
            self.origin + offset,
            self.lower_left + self.horizontal * s + self.vertical * t - self.origin - offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn config() -> CameraConfig {
        CameraConfig {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::zero(),
            orientation: Vec3::unit_y(),
            vertical_fov_degrees: 40.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_distance: 5.0,
        }
    }

    #[test]
    fn center_of_frame_points_at_the_target() {
        let camera = Camera::new(&config());
        let mut rng = SmallRng::seed_from_u64(0);
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!(ray.direction.x.abs() < 1e-9);
        assert!(ray.direction.y.abs() < 1e-9);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn zero_aperture_is_a_pinhole_camera() {
        let camera = Camera::new(&config());
        let mut rng = SmallRng::seed_from_u64(1);
        let a = camera.get_ray(0.2, 0.8, &mut rng);
        let b = camera.get_ray(0.2, 0.8, &mut rng);
        assert_eq!(a.origin, b.origin);
    }

    #[test]
    fn nonzero_aperture_jitters_ray_origin() {
        let mut cfg = config();
        cfg.aperture = 1.0;
        let camera = Camera::new(&cfg);
        let mut rng = SmallRng::seed_from_u64(2);
        let a = camera.get_ray(0.5, 0.5, &mut rng);
        let b = camera.get_ray(0.5, 0.5, &mut rng);
        assert_ne!(a.origin, b.origin);
    }
}
