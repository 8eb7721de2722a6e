//! Scene objects — a transform, a material, and one of a closed set of shapes.
//!
//! Every shape computes its intersection and surface attributes in its own object space; the
//! surrounding [`Object`] handles moving rays and hit results to and from world space via its
//! [`Transform`]. A non-uniform scale would distort a naively-transformed object-space `t`
//! back into world space, so [`Object::intersect`] instead re-measures the distance by mapping
//! the object-space hit *point* to world space and re-deriving `t` from the (unit-length)
//! world-space ray direction.

use std::sync::Arc;

use crate::material::Material;
use crate::math::{BoundingBox, Point3, Ray, Vec3};
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Surface attributes at a hit point, in world space, ready for [`crate::material::Material`]
/// and [`crate::integrator::PathIntegrator`] to consume.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub position: Point3,
    pub normal: Vec3,
    /// Orthonormal surface tangent, alongside [`SurfaceHit::bitangent`] and `normal`. Not
    /// consumed by any [`crate::material::Material`] in this engine today, but part of the
    /// surface contract every shape fills in regardless — the natural seam for a future
    /// normal-mapped material.
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv: (f64, f64),
}

/// The closed set of primitive shapes an [`Object`] can be.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere { radius: f64 },
    /// The object-space plane `y = 0`, normal `+Y`; orientation comes entirely from the
    /// object's [`Transform`]. `texture_scale` tiles the planar (x, z) texture projection.
    Plane { texture_scale: f64 },
    /// Axis-aligned in object space, centered at the origin, spanning `[-size/2, size/2]`.
    Box { size: Vec3 },
    /// `Arc`-shared so the same vertex/triangle/BVH data can back many `MeshObject`s without
    /// duplicating the underlying buffers each time a scene places another instance.
    Mesh(Arc<Mesh>),
}

impl Shape {
    /// Intersects a ray already expressed in this shape's object space. Returns the
    /// object-space distance to the nearest valid hit.
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self {
            Shape::Sphere { radius } => intersect_sphere(ray, *radius),
            Shape::Plane { .. } => intersect_plane(ray),
            Shape::Box { size } => intersect_box(ray, *size).map(|(t, _)| t),
            Shape::Mesh(mesh) => mesh.intersect(ray).map(|hit| hit.distance),
        }
    }

    /// Surface normal, tangent basis, and uv at an object-space hit point. `ray` is re-supplied
    /// for [`Shape::Mesh`], whose per-triangle attributes are cheapest to recompute alongside the
    /// intersection rather than carried out-of-band — mirroring this engine's [`Object`]
    /// contract of calling `intersect` and the surface query as two independent passes.
    fn surface_properties(&self, position: Point3, ray: &Ray) -> (Vec3, Vec3, Vec3, (f64, f64)) {
        match self {
            Shape::Sphere { .. } => {
                let normal = position.unit();
                let tangent = Vec3::new(-normal.z, 0.0, normal.x).unit();
                let bitangent = normal.cross(tangent);
                (normal, tangent, bitangent, sphere_uv(position))
            }
            Shape::Plane { texture_scale } => (
                Vec3::unit_y(),
                Vec3::unit_x(),
                Vec3::unit_z(),
                plane_uv(position, *texture_scale),
            ),
            Shape::Box { size } => box_surface_properties(position, *size),
            Shape::Mesh(mesh) => {
                let hit = mesh.intersect(ray).expect("re-intersection must reproduce the hit");
                (hit.normal, hit.tangent, hit.bitangent, hit.uv)
            }
        }
    }

    /// A conservative object-space bounding box, used by the scene to bound lighting queries
    /// and by callers that want a cheap pre-filter before a full intersection test.
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Shape::Sphere { radius } => {
                let r = Vec3::new(*radius, *radius, *radius);
                BoundingBox::from_corners(-r, r)
            }
            Shape::Plane { .. } => BoundingBox::empty(),
            Shape::Box { size } => BoundingBox::from_corners(*size * -0.5, *size * 0.5),
            Shape::Mesh(mesh) => mesh.bounds(),
        }
    }
}

/// A scene object: a shape placed by a [`Transform`] and given appearance by a [`Material`].
#[derive(Debug, Clone)]
pub struct Object {
    pub transform: Transform,
    pub material: Material,
    pub shape: Shape,
}

impl Object {
    pub fn new(transform: Transform, material: Material, shape: Shape) -> Self {
        Self {
            transform,
            material,
            shape,
        }
    }

    /// World-space intersection distance, or `None` on a miss.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let object_ray = self.transform.ray_to_object(ray);
        let t_object = self.shape.intersect(&object_ray)?;
        let object_hit = object_ray.at(t_object);
        let world_hit = self.transform.point_to_world(object_hit);
        Some((world_hit - ray.origin).length())
    }

    /// Surface attributes at a previously-found hit distance along `ray`.
    pub fn surface_at(&self, ray: &Ray, distance: f64) -> SurfaceHit {
        let world_position = ray.at(distance);
        let object_position = self.transform.point_to_object(world_position);
        let object_ray = self.transform.ray_to_object(ray);
        let (object_normal, object_tangent, object_bitangent, uv) =
            self.shape.surface_properties(object_position, &object_ray);
        SurfaceHit {
            position: world_position,
            normal: self.transform.normal_to_world(object_normal),
            // Tangent and bitangent ride along with the surface, not against it like the
            // normal does, so they move with the forward matrix rather than its inverse-transpose.
            tangent: self.transform.direction_to_world(object_tangent).unit(),
            bitangent: self.transform.direction_to_world(object_bitangent).unit(),
            uv,
        }
    }
}

fn intersect_sphere(ray: &Ray, radius: f64) -> Option<f64> {
    let oc = ray.origin;
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / 2.0;
    let far = (-b + sqrt_d) / 2.0;
    if near >= Ray::EPSILON {
        Some(near)
    } else if far >= Ray::EPSILON {
        Some(far)
    } else {
        None
    }
}

fn sphere_uv(object_position: Point3) -> (f64, f64) {
    use std::f64::consts::PI;
    let n = object_position.unit();
    let u = 0.5 + n.z.atan2(n.x) / (2.0 * PI);
    let v = 0.5 + n.y.asin() / PI;
    (u, v)
}

fn intersect_plane(ray: &Ray) -> Option<f64> {
    let denom = ray.direction.y;
    if denom.abs() < 1e-10 {
        return None;
    }
    let t = -ray.origin.y / denom;
    if t < Ray::EPSILON {
        return None;
    }
    Some(t)
}

fn plane_uv(object_position: Point3, texture_scale: f64) -> (f64, f64) {
    let mut u = object_position.x * texture_scale;
    let mut v = object_position.z * texture_scale;
    u -= u.floor();
    v -= v.floor();
    (u, v)
}

/// Slab-method intersection against a box spanning `[-size/2, size/2]`. Returns the entry
/// distance and the hit point, the latter reused by [`box_surface_properties`] to pick a face.
fn intersect_box(ray: &Ray, size: Vec3) -> Option<(f64, Point3)> {
    let half = size * 0.5;
    let t1 = (-half - ray.origin) * ray.inverse_direction;
    let t2 = (half - ray.origin) * ray.inverse_direction;

    let min_point = Vec3::new(t1.x.min(t2.x), t1.y.min(t2.y), t1.z.min(t2.z));
    let max_point = Vec3::new(t1.x.max(t2.x), t1.y.max(t2.y), t1.z.max(t2.z));

    let tmin = min_point.x.max(min_point.y).max(min_point.z);
    let tmax = max_point.x.min(max_point.y).min(max_point.z);

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    let t = if tmin >= Ray::EPSILON { tmin } else { tmax };
    if t < Ray::EPSILON {
        return None;
    }
    Some((t, ray.at(t)))
}

/// Picks the hit face from the closest axis to the box's extent, then maps the point onto the
/// classic six-face cross unwrap (two columns for top/bottom either side of a 4-wide equatorial
/// band), `kStepU = 1/4`, `kStepV = 1/3`. Tangent/bitangent per face follow the same fixed table
/// as the normal and uv — every point on a face shares one flat basis.
fn box_surface_properties(object_position: Point3, size: Vec3) -> (Vec3, Vec3, Vec3, (f64, f64)) {
    const EPS: f64 = 1e-6;
    const STEP_U: f64 = 1.0 / 4.0;
    const STEP_V: f64 = 1.0 / 3.0;

    let half = size * 0.5;
    // Shift into the original's [0, size] corner-origin convention for the uv table.
    let p = object_position + half;

    let (normal, tangent, bitangent, uv_u, uv_v) = if (object_position.z + half.z).abs() < EPS {
        (
            -Vec3::unit_z(),
            Vec3::unit_y(),
            Vec3::unit_x(),
            STEP_U * (1.0 + p.x / size.x),
            STEP_V * (1.0 + p.y / size.y),
        )
    } else if (object_position.x + half.x).abs() < EPS {
        (
            -Vec3::unit_x(),
            Vec3::unit_y(),
            -Vec3::unit_z(),
            STEP_U * (size.z - p.z) / size.z,
            STEP_V * (1.0 + p.y / size.y),
        )
    } else if (object_position.y + half.y).abs() < EPS {
        (
            -Vec3::unit_y(),
            Vec3::unit_z(),
            Vec3::unit_x(),
            STEP_U * (1.0 + (size.z - p.z) / size.z),
            STEP_V * (p.x / size.x),
        )
    } else if (object_position.y - half.y).abs() < EPS {
        (
            Vec3::unit_y(),
            -Vec3::unit_z(),
            Vec3::unit_x(),
            STEP_U * (1.0 + p.x / size.x),
            STEP_V * (2.0 + p.z / size.z),
        )
    } else if (object_position.x - half.x).abs() < EPS {
        (
            Vec3::unit_x(),
            Vec3::unit_y(),
            Vec3::unit_z(),
            STEP_U * (2.0 + p.z / size.z),
            STEP_V * (1.0 + p.y / size.y),
        )
    } else {
        (
            Vec3::unit_z(),
            Vec3::unit_y(),
            -Vec3::unit_x(),
            STEP_U * (3.0 + (size.x - p.x) / size.x),
            STEP_V * (1.0 + p.y / size.y),
        )
    };

    (normal, tangent, bitangent, (uv_u, uv_v))
}
