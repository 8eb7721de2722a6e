//! Triangle meshes and their acceleration structure.
//!
//! Below [`BVH_TRIANGLE_THRESHOLD`] triangles a linear scan is cheaper than building and
//! walking a tree; above it, [`MeshBvh`] prunes with the same bounding-box slab test used
//! everywhere else in the engine.

use crate::math::{BoundingBox, Point3, Ray, Vec3};

/// Meshes with fewer triangles than this skip BVH construction entirely and intersect every
/// triangle directly — small enough that tree-walking overhead would dominate.
pub const BVH_TRIANGLE_THRESHOLD: usize = 8;

/// A single mesh vertex: position plus the interpolated attributes carried to a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3,
    pub normal: Vec3,
    pub uv: (f64, f64),
}

/// Vertex indices for one triangle, in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle(pub u32, pub u32, pub u32);

/// The result of a successful triangle hit: distance plus the interpolated surface attributes
/// at that point, so the caller never has to re-walk the mesh to fetch them.
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    pub distance: f64,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv: (f64, f64),
}

/// A triangle mesh in object space, with its vertex buffer, index buffer, and bounding box.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    bounds: BoundingBox,
    bvh: Option<MeshBvh>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        let mut bounds = BoundingBox::empty();
        for v in &vertices {
            bounds.include(v.position);
        }

        let bvh = if triangles.len() >= BVH_TRIANGLE_THRESHOLD {
            Some(MeshBvh::build(&vertices, &triangles))
        } else {
            None
        };

        Self {
            vertices,
            triangles,
            bounds,
            bvh,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Intersects a ray, already in this mesh's object space, against every triangle (via the
    /// BVH if one was built) and returns the closest hit.
    pub fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        match &self.bvh {
            Some(bvh) => bvh.intersect(&self.vertices, &self.triangles, ray),
            None => intersect_linear(&self.vertices, &self.triangles, ray, None),
        }
    }
}

/// Möller–Trumbore intersection of `ray` against one triangle. Returns `(distance, u, v)`
/// barycentric coordinates on hit.
fn intersect_triangle(vertices: &[Vertex], tri: &Triangle, ray: &Ray) -> Option<(f64, f64, f64)> {
    const EPSILON: f64 = 1e-10;

    let v0 = vertices[tri.0 as usize].position;
    let v1 = vertices[tri.1 as usize].position;
    let v2 = vertices[tri.2 as usize].position;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let ray_cross_e2 = ray.direction.cross(edge2);

    let det = edge1.dot(ray_cross_e2);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - v0;
    let u = inv_det * s.dot(ray_cross_e2);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let s_cross_e1 = s.cross(edge1);
    let v = inv_det * ray.direction.dot(s_cross_e1);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(s_cross_e1);
    if t < Ray::EPSILON {
        return None;
    }

    Some((t, u, v))
}

fn shade_hit(vertices: &[Vertex], tri: &Triangle, distance: f64, u: f64, v: f64) -> MeshHit {
    let v0 = vertices[tri.0 as usize].position;
    let v1 = vertices[tri.1 as usize].position;

    let n0 = vertices[tri.0 as usize].normal;
    let n1 = vertices[tri.1 as usize].normal;
    let n2 = vertices[tri.2 as usize].normal;
    let w = 1.0 - u - v;
    let normal = (n0 * w + n1 * u + n2 * v).unit();

    let uv0 = vertices[tri.0 as usize].uv;
    let uv1 = vertices[tri.1 as usize].uv;
    let uv2 = vertices[tri.2 as usize].uv;
    let uv = (
        uv0.0 * w + uv1.0 * u + uv2.0 * v,
        uv0.1 * w + uv1.1 * u + uv2.1 * v,
    );

    // The first edge, projected orthogonal to the shading normal, gives a tangent that stays
    // perpendicular to a (possibly interpolated) normal that isn't itself the triangle's flat one.
    let edge1 = v1 - v0;
    let tangent = (edge1 - normal * normal.dot(edge1)).unit();
    let bitangent = normal.cross(tangent);

    MeshHit {
        distance,
        normal,
        tangent,
        bitangent,
        uv,
    }
}

fn intersect_linear(
    vertices: &[Vertex],
    triangles: &[Triangle],
    ray: &Ray,
    indices: Option<&[u32]>,
) -> Option<MeshHit> {
    let mut best: Option<MeshHit> = None;
    let mut visit = |tri: &Triangle| {
        if let Some((t, u, v)) = intersect_triangle(vertices, tri, ray) {
            if best.map_or(true, |b| t < b.distance) {
                best = Some(shade_hit(vertices, tri, t, u, v));
            }
        }
    };
    match indices {
        Some(idx) => {
            for &i in idx {
                visit(&triangles[i as usize]);
            }
        }
        None => {
            for tri in triangles {
                visit(tri);
            }
        }
    }
    best
}

/// A midpoint-split bounding volume hierarchy over a mesh's triangles.
#[derive(Debug, Clone)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
}

#[derive(Debug, Clone)]
enum BvhNode {
    Leaf {
        bounds: BoundingBox,
        triangle_indices: Vec<u32>,
    },
    Split {
        bounds: BoundingBox,
        left: usize,
        right: usize,
    },
}

impl MeshBvh {
    fn build(vertices: &[Vertex], triangles: &[Triangle]) -> Self {
        let indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let mut nodes = Vec::new();
        build_node(vertices, triangles, indices, &mut nodes);
        Self { nodes }
    }

    fn intersect(&self, vertices: &[Vertex], triangles: &[Triangle], ray: &Ray) -> Option<MeshHit> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<MeshHit> = None;
        self.walk(0, vertices, triangles, ray, &mut best);
        best
    }

    fn walk(
        &self,
        node: usize,
        vertices: &[Vertex],
        triangles: &[Triangle],
        ray: &Ray,
        best: &mut Option<MeshHit>,
    ) {
        match &self.nodes[node] {
            BvhNode::Leaf {
                bounds,
                triangle_indices,
            } => {
                if bounds.intersect(ray).is_none() {
                    return;
                }
                if let Some(hit) = intersect_linear(vertices, triangles, ray, Some(triangle_indices)) {
                    if best.map_or(true, |b| hit.distance < b.distance) {
                        *best = Some(hit);
                    }
                }
            }
            BvhNode::Split {
                bounds,
                left,
                right,
            } => {
                if bounds.intersect(ray).is_none() {
                    return;
                }
                self.walk(*left, vertices, triangles, ray, best);
                self.walk(*right, vertices, triangles, ray, best);
            }
        }
    }
}

/// Leaves below this size stop splitting even if the recursion would otherwise continue.
const LEAF_TRIANGLES: usize = 4;

fn build_node(
    vertices: &[Vertex],
    triangles: &[Triangle],
    indices: Vec<u32>,
    nodes: &mut Vec<BvhNode>,
) -> usize {
    let bounds = triangle_bounds(vertices, triangles, &indices);

    if indices.len() <= LEAF_TRIANGLES {
        nodes.push(BvhNode::Leaf {
            bounds,
            triangle_indices: indices,
        });
        return nodes.len() - 1;
    }

    let axis = bounds.longest_axis();
    let mut centroids: Vec<(u32, f64)> = indices
        .iter()
        .map(|&i| (i, centroid(vertices, &triangles[i as usize])[axis]))
        .collect();
    centroids.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mid = centroids.len() / 2;
    let left_indices: Vec<u32> = centroids[..mid].iter().map(|(i, _)| *i).collect();
    let right_indices: Vec<u32> = centroids[mid..].iter().map(|(i, _)| *i).collect();

    if left_indices.is_empty() || right_indices.is_empty() {
        nodes.push(BvhNode::Leaf {
            bounds,
            triangle_indices: indices,
        });
        return nodes.len() - 1;
    }

    let left = build_node(vertices, triangles, left_indices, nodes);
    let right = build_node(vertices, triangles, right_indices, nodes);
    nodes.push(BvhNode::Split {
        bounds,
        left,
        right,
    });
    nodes.len() - 1
}

fn centroid(vertices: &[Vertex], tri: &Triangle) -> Vec3 {
    let v0 = vertices[tri.0 as usize].position;
    let v1 = vertices[tri.1 as usize].position;
    let v2 = vertices[tri.2 as usize].position;
    (v0 + v1 + v2) / 3.0
}

fn triangle_bounds(vertices: &[Vertex], triangles: &[Triangle], indices: &[u32]) -> BoundingBox {
    let mut bounds = BoundingBox::empty();
    for &i in indices {
        let tri = &triangles[i as usize];
        bounds.include(vertices[tri.0 as usize].position);
        bounds.include(vertices[tri.1 as usize].position);
        bounds.include(vertices[tri.2 as usize].position);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> (Vec<Vertex>, Vec<Triangle>) {
        let vertices = vec![
            Vertex {
                position: Point3::new(-1.0, -1.0, 0.0),
                normal: Vec3::unit_z(),
                uv: (0.0, 0.0),
            },
            Vertex {
                position: Point3::new(1.0, -1.0, 0.0),
                normal: Vec3::unit_z(),
                uv: (1.0, 0.0),
            },
            Vertex {
                position: Point3::new(0.0, 1.0, 0.0),
                normal: Vec3::unit_z(),
                uv: (0.5, 1.0),
            },
        ];
        (vertices, vec![Triangle(0, 1, 2)])
    }

    #[test]
    fn ray_through_triangle_center_hits() {
        let (vertices, triangles) = unit_triangle();
        let mesh = Mesh::new(vertices, triangles);
        let ray = Ray::new(Point3::new(0.0, -0.3, -5.0), Vec3::unit_z());
        let hit = mesh.intersect(&ray).expect("should hit the triangle");
        assert!((hit.distance - 5.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::unit_z()).length() < 1e-9);
    }

    #[test]
    fn triangle_hit_reports_an_orthonormal_tangent_basis() {
        let (vertices, triangles) = unit_triangle();
        let mesh = Mesh::new(vertices, triangles);
        let ray = Ray::new(Point3::new(0.0, -0.3, -5.0), Vec3::unit_z());
        let hit = mesh.intersect(&ray).expect("should hit the triangle");
        assert!((hit.tangent.length() - 1.0).abs() < 1e-9);
        assert!((hit.bitangent.length() - 1.0).abs() < 1e-9);
        assert!(hit.tangent.dot(hit.normal).abs() < 1e-9);
        assert!((hit.normal.cross(hit.tangent) - hit.bitangent).length() < 1e-9);
    }

    #[test]
    fn ray_outside_triangle_misses() {
        let (vertices, triangles) = unit_triangle();
        let mesh = Mesh::new(vertices, triangles);
        let ray = Ray::new(Point3::new(5.0, 5.0, -5.0), Vec3::unit_z());
        assert!(mesh.intersect(&ray).is_none());
    }

    #[test]
    fn large_mesh_builds_a_bvh_and_still_finds_the_closest_hit() {
        // A 4x4 grid of quads (32 triangles) in the z=0 plane, well past the BVH threshold.
        let mut vertices = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                vertices.push(Vertex {
                    position: Point3::new(x as f64, y as f64, 0.0),
                    normal: Vec3::unit_z(),
                    uv: (x as f64 / 4.0, y as f64 / 4.0),
                });
            }
        }
        let mut triangles = Vec::new();
        for y in 0..4u32 {
            for x in 0..4u32 {
                let i0 = y * 5 + x;
                let i1 = i0 + 1;
                let i2 = i0 + 5;
                let i3 = i2 + 1;
                triangles.push(Triangle(i0, i1, i2));
                triangles.push(Triangle(i1, i3, i2));
            }
        }
        assert!(triangles.len() >= BVH_TRIANGLE_THRESHOLD);
        let mesh = Mesh::new(vertices, triangles);

        let ray = Ray::new(Point3::new(2.2, 2.2, -5.0), Vec3::unit_z());
        let hit = mesh.intersect(&ray).expect("should hit the grid");
        assert!((hit.distance - 5.0).abs() < 1e-9);
    }
}
