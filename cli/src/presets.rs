//! Built-in scene presets. Each demonstrates a different corner of the engine's geometry and
//! material set so the CLI has something to render without requiring a scene file format.

use photon_engine::{
    CameraConfig, Color, DebugMode, Material, Mesh, Object, Point3, Shape, Texture, Transform,
    Triangle, Vec3, Vertex,
};
use rand::Rng;

/// A scene preset's raw ingredients, before [`photon_engine::Scene::validate`] assembles them.
pub struct SceneDescription {
    pub name: &'static str,
    pub objects: Vec<Object>,
    pub camera_config: CameraConfig,
    pub background: Texture,
}

/// Available built-in scene presets.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScenePreset {
    /// A random arrangement of diffuse, reflective, and glass spheres on a checkerboard ground
    /// — the classic "one weekend" composition.
    Showcase,
    /// A small enclosed room (five planes) lit by an overhead light sphere, with a diffuse and
    /// a reflective box.
    Cornell,
    /// A single reflective sphere on a ground plane — useful for benchmarking.
    Minimal,
    /// Demonstrates every primitive and material in one frame: sphere, plane, box, mesh;
    /// diffuse, reflective, dielectric, light, debug.
    Gallery,
    /// A field of many small spheres, to exercise the renderer's scan-order intersection cost.
    Stress,
}

impl ScenePreset {
    pub fn build(self) -> SceneDescription {
        match self {
            ScenePreset::Showcase => build_showcase(),
            ScenePreset::Cornell => build_cornell(),
            ScenePreset::Minimal => build_minimal(),
            ScenePreset::Gallery => build_gallery(),
            ScenePreset::Stress => build_stress(),
        }
    }
}

/// `+Y`, the orientation every preset hands the camera — the engine itself has no default.
const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

fn sphere(position: Point3, radius: f64, material: Material) -> Object {
    Object::new(
        Transform::new(position, Vec3::zero(), Vec3::ones()).expect("unit scale is never zero"),
        material,
        Shape::Sphere { radius },
    )
}

fn ground_plane(material: Material) -> Object {
    Object::new(Transform::identity(), material, Shape::Plane { texture_scale: 1.0 })
}

fn build_showcase() -> SceneDescription {
    let mut objects = Vec::new();
    let mut rng = rand::thread_rng();

    objects.push(ground_plane(Material::Diffuse(Texture::Checkerboard {
        c1: Color::new(0.05, 0.05, 0.05),
        c2: Color::new(0.9, 0.9, 0.9),
        rows_cols: 20.0,
    })));

    objects.push(sphere(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Material::Dielectric {
            refraction_index: 1.5,
        },
    ));
    objects.push(sphere(
        Point3::new(-2.2, 1.0, 0.0),
        1.0,
        Material::Diffuse(Texture::Solid(Color::new(0.7, 0.15, 0.15))),
    ));
    objects.push(sphere(
        Point3::new(2.2, 1.0, 0.0),
        1.0,
        Material::Reflective {
            albedo: Texture::Solid(Color::new(0.75, 0.75, 0.8)),
            polish: 0.95,
        },
    ));

    for _ in 0..20 {
        let x = rng.gen_range(-6.0..6.0);
        let z = rng.gen_range(-6.0..4.0);
        let center = Point3::new(x, 0.2, z);
        if (center - Point3::new(0.0, 0.2, 0.0)).length() < 1.4 {
            continue;
        }
        let choice: f64 = rng.gen();
        let material = if choice < 0.6 {
            Material::Diffuse(Texture::Solid(Color::new(rng.gen(), rng.gen(), rng.gen())))
        } else if choice < 0.9 {
            Material::Reflective {
                albedo: Texture::Solid(Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                )),
                polish: rng.gen_range(0.5..1.0),
            }
        } else {
            Material::Dielectric {
                refraction_index: 1.5,
            }
        };
        objects.push(sphere(center, 0.2, material));
    }

    objects.push(sphere(
        Point3::new(0.0, 20.0, 10.0),
        6.0,
        Material::Light(Texture::Solid(Color::new(6.0, 6.0, 5.5))),
    ));

    SceneDescription {
        name: "showcase",
        objects,
        camera_config: CameraConfig {
            position: Point3::new(13.0, 3.0, 4.0),
            target: Point3::new(0.0, 0.5, 0.0),
            orientation: UP,
            vertical_fov_degrees: 22.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.08,
            focus_distance: 13.5,
        },
        background: Texture::Solid(Color::new(0.02, 0.02, 0.03)),
    }
}

fn build_cornell() -> SceneDescription {
    let red = Material::Diffuse(Texture::Solid(Color::new(0.65, 0.05, 0.05)));
    let green = Material::Diffuse(Texture::Solid(Color::new(0.12, 0.45, 0.15)));
    let white = Material::Diffuse(Texture::Solid(Color::new(0.73, 0.73, 0.73)));

    let half = 4.0;
    let objects = vec![
        // Floor
        Object::new(
            Transform::new(Point3::new(0.0, -half, 0.0), Vec3::zero(), Vec3::ones()).unwrap(),
            white.clone(),
            Shape::Plane { texture_scale: 1.0 },
        ),
        // Ceiling, facing down
        Object::new(
            Transform::new(
                Point3::new(0.0, half, 0.0),
                Vec3::new(std::f64::consts::PI, 0.0, 0.0),
                Vec3::ones(),
            )
            .unwrap(),
            white.clone(),
            Shape::Plane { texture_scale: 1.0 },
        ),
        // Back wall, facing the camera
        Object::new(
            Transform::new(
                Point3::new(0.0, 0.0, -half),
                Vec3::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0),
                Vec3::ones(),
            )
            .unwrap(),
            white,
            Shape::Plane { texture_scale: 1.0 },
        ),
        // Left wall (red)
        Object::new(
            Transform::new(
                Point3::new(-half, 0.0, 0.0),
                Vec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
                Vec3::ones(),
            )
            .unwrap(),
            red,
            Shape::Plane { texture_scale: 1.0 },
        ),
        // Right wall (green)
        Object::new(
            Transform::new(
                Point3::new(half, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -std::f64::consts::FRAC_PI_2),
                Vec3::ones(),
            )
            .unwrap(),
            green,
            Shape::Plane { texture_scale: 1.0 },
        ),
        // Ceiling light
        sphere(
            Point3::new(0.0, half - 0.2, 0.0),
            1.2,
            Material::Light(Texture::Solid(Color::new(4.0, 4.0, 4.0))),
        ),
        // Diffuse box
        Object::new(
            Transform::new(
                Point3::new(-1.6, -half + 1.5, -1.0),
                Vec3::new(0.0, 0.35, 0.0),
                Vec3::ones(),
            )
            .unwrap(),
            Material::Diffuse(Texture::Solid(Color::new(0.72, 0.7, 0.65))),
            Shape::Box {
                size: Vec3::new(2.2, 3.0, 2.2),
            },
        ),
        // Reflective box
        Object::new(
            Transform::new(
                Point3::new(1.7, -half + 1.0, 1.2),
                Vec3::new(0.0, -0.3, 0.0),
                Vec3::ones(),
            )
            .unwrap(),
            Material::Reflective {
                albedo: Texture::Solid(Color::new(0.85, 0.85, 0.85)),
                polish: 0.9,
            },
            Shape::Box {
                size: Vec3::new(2.0, 2.0, 2.0),
            },
        ),
    ];

    SceneDescription {
        name: "cornell",
        objects,
        camera_config: CameraConfig {
            position: Point3::new(0.0, 0.0, 13.0),
            target: Point3::new(0.0, 0.0, 0.0),
            orientation: UP,
            vertical_fov_degrees: 38.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_distance: 13.0,
        },
        background: Texture::Solid(Color::zero()),
    }
}

fn build_minimal() -> SceneDescription {
    let objects = vec![
        ground_plane(Material::Diffuse(Texture::Checkerboard {
            c1: Color::new(0.1, 0.1, 0.1),
            c2: Color::new(0.8, 0.8, 0.8),
            rows_cols: 8.0,
        })),
        sphere(
            Point3::new(0.0, 1.0, 0.0),
            1.0,
            Material::Reflective {
                albedo: Texture::Solid(Color::new(0.8, 0.8, 0.85)),
                polish: 1.0,
            },
        ),
        sphere(
            Point3::new(4.0, 5.0, 2.0),
            1.5,
            Material::Light(Texture::Solid(Color::new(8.0, 8.0, 7.5))),
        ),
    ];

    SceneDescription {
        name: "minimal",
        objects,
        camera_config: CameraConfig {
            position: Point3::new(0.0, 1.5, 5.0),
            target: Point3::new(0.0, 0.8, 0.0),
            orientation: UP,
            vertical_fov_degrees: 40.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 5.0,
        },
        background: Texture::Solid(Color::new(0.4, 0.55, 0.7)),
    }
}

fn pyramid_mesh() -> Mesh {
    let apex = Vertex {
        position: Point3::new(0.0, 1.0, 0.0),
        normal: Vec3::unit_y(),
        uv: (0.5, 1.0),
    };
    let base = [
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ];
    let mut vertices = vec![apex];
    for (i, &p) in base.iter().enumerate() {
        vertices.push(Vertex {
            position: p,
            normal: Vec3::unit_y(),
            uv: (i as f64 / 4.0, 0.0),
        });
    }
    let triangles = vec![
        Triangle(0, 1, 2),
        Triangle(0, 2, 3),
        Triangle(0, 3, 4),
        Triangle(0, 4, 1),
    ];
    Mesh::new(vertices, triangles)
}

fn build_gallery() -> SceneDescription {
    let objects = vec![
        ground_plane(Material::Diffuse(Texture::Checkerboard {
            c1: Color::new(0.08, 0.08, 0.1),
            c2: Color::new(0.6, 0.6, 0.65),
            rows_cols: 12.0,
        })),
        sphere(
            Point3::new(-4.5, 1.0, 0.0),
            1.0,
            Material::Diffuse(Texture::Solid(Color::new(0.2, 0.5, 0.8))),
        ),
        sphere(
            Point3::new(-1.5, 1.0, 0.0),
            1.0,
            Material::Reflective {
                albedo: Texture::Solid(Color::new(0.9, 0.6, 0.2)),
                polish: 0.8,
            },
        ),
        sphere(
            Point3::new(1.5, 1.0, 0.0),
            1.0,
            Material::Dielectric {
                refraction_index: 1.5,
            },
        ),
        Object::new(
            Transform::new(Point3::new(4.5, 1.0, 0.0), Vec3::new(0.0, 0.4, 0.0), Vec3::ones()).unwrap(),
            Material::Debug(DebugMode::Normal),
            Shape::Box {
                size: Vec3::new(1.6, 1.6, 1.6),
            },
        ),
        Object::new(
            Transform::new(Point3::new(0.0, 1.0, -3.0), Vec3::zero(), Vec3::new(1.2, 1.2, 1.2)).unwrap(),
            Material::Diffuse(Texture::Solid(Color::new(0.85, 0.2, 0.3))),
            Shape::Mesh(std::sync::Arc::new(pyramid_mesh())),
        ),
        sphere(
            Point3::new(0.0, 9.0, 6.0),
            2.5,
            Material::Light(Texture::Solid(Color::new(5.0, 5.0, 5.0))),
        ),
    ];

    SceneDescription {
        name: "gallery",
        objects,
        camera_config: CameraConfig {
            position: Point3::new(0.0, 3.0, 11.0),
            target: Point3::new(0.0, 0.8, 0.0),
            orientation: UP,
            vertical_fov_degrees: 35.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 11.0,
        },
        background: Texture::Solid(Color::new(0.05, 0.05, 0.08)),
    }
}

fn build_stress() -> SceneDescription {
    let mut objects = Vec::new();
    let mut rng = rand::thread_rng();

    objects.push(ground_plane(Material::Diffuse(Texture::Solid(Color::new(
        0.5, 0.5, 0.5,
    )))));

    for gx in -6..6 {
        for gz in -6..6 {
            let center = Point3::new(gx as f64 * 1.3, 0.25, gz as f64 * 1.3);
            let material = Material::Diffuse(Texture::Solid(Color::new(
                rng.gen(),
                rng.gen(),
                rng.gen(),
            )));
            objects.push(sphere(center, 0.25, material));
        }
    }

    objects.push(sphere(
        Point3::new(0.0, 15.0, 0.0),
        4.0,
        Material::Light(Texture::Solid(Color::new(4.0, 4.0, 4.0))),
    ));

    SceneDescription {
        name: "stress",
        objects,
        camera_config: CameraConfig {
            position: Point3::new(10.0, 8.0, 10.0),
            target: Point3::zero(),
            orientation: UP,
            vertical_fov_degrees: 35.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 15.0,
        },
        background: Texture::Solid(Color::new(0.03, 0.03, 0.04)),
    }
}
