//! Cross-module end-to-end scenarios, exercised through the renderer rather than unit-level
//! APIs — each is grounded in a distinct behavior guarantee the engine makes as a whole.

use photon_engine::{
    Camera, CameraConfig, Color, Material, Object, Point3, Renderer, Scene, Shape, Texture,
    Transform, Vec3,
};

fn camera(aspect: f64) -> Camera {
    Camera::new(&CameraConfig {
        position: Point3::new(0.0, 0.0, 6.0),
        target: Point3::zero(),
        orientation: Vec3::unit_y(),
        vertical_fov_degrees: 40.0,
        aspect_ratio: aspect,
        aperture: 0.0,
        focus_distance: 6.0,
    })
}

fn sphere_at(z: f64, radius: f64, material: Material) -> Object {
    Object::new(
        Transform::new(Point3::new(0.0, 0.0, z), Vec3::zero(), Vec3::ones()).unwrap(),
        material,
        Shape::Sphere { radius },
    )
}

fn render(scene: Scene, width: usize, height: usize) -> Vec<u32> {
    let mut renderer = Renderer::new(width, height, 2).unwrap().with_seed(1234);
    renderer.set_scene(scene).unwrap();
    renderer.start_render().unwrap();
    renderer.wait_for_render_completion();
    renderer.pixels()
}

fn channel_bytes(pixel: u32) -> (u8, u8, u8) {
    (
        (pixel & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        ((pixel >> 16) & 0xFF) as u8,
    )
}

#[test]
fn empty_scene_with_a_single_light_sphere_is_seen_directly() {
    let light = sphere_at(-3.0, 1.5, Material::Light(Texture::Solid(Color::new(3.0, 1.0, 1.0))));
    let scene = Scene::validate(camera(1.0), Texture::Solid(Color::zero()), vec![light], 4, 4, true)
        .unwrap();
    let pixels = render(scene, 24, 24);
    let center = pixels[12 * 24 + 12];
    let (r, g, b) = channel_bytes(center);
    assert!(r > g && r > b, "center pixel should read red-tinted, got ({r},{g},{b})");
}

#[test]
fn a_ray_that_misses_everything_returns_the_background() {
    let background = Texture::Solid(Color::new(0.1, 0.2, 0.9));
    let scene = Scene::validate(camera(1.0), background, vec![], 4, 1, true).unwrap();
    let pixels = render(scene, 8, 8);
    // Nothing occupies the frame, so every pixel samples the (direction-invariant) solid
    // background color.
    let first = pixels[0];
    assert!(pixels.iter().all(|&p| p == first));
}

#[test]
fn red_diffuse_floor_tints_light_bouncing_off_it() {
    let floor = Object::new(
        Transform::new(Point3::new(0.0, -1.0, 0.0), Vec3::zero(), Vec3::ones()).unwrap(),
        Material::Diffuse(Texture::Solid(Color::new(0.9, 0.05, 0.05))),
        Shape::Plane { texture_scale: 1.0 },
    );
    let light = sphere_at(-1.0, 3.0, Material::Light(Texture::Solid(Color::new(4.0, 4.0, 4.0))));
    let scene = Scene::validate(
        camera(1.0),
        Texture::Solid(Color::new(0.02, 0.02, 0.02)),
        vec![floor, light],
        8,
        16,
        true,
    )
    .unwrap();
    let pixels = render(scene, 32, 32);
    // Bottom rows of the frame look down at the floor; they should read warmer (more red than
    // blue) than a scene with no colored floor would produce.
    let (r, _g, b) = channel_bytes(pixels[30 * 32 + 16]);
    assert!(r >= b);
}

fn mirror_scene() -> Scene {
    let mirror = sphere_at(
        -2.0,
        1.0,
        Material::Reflective {
            albedo: Texture::Solid(Color::ones()),
            polish: 1.0,
        },
    );
    let light = sphere_at(-6.0, 2.0, Material::Light(Texture::Solid(Color::new(2.0, 2.0, 2.0))));
    Scene::validate(camera(1.0), Texture::Solid(Color::zero()), vec![mirror, light], 8, 1, true)
        .unwrap()
}

#[test]
fn perfect_mirror_reflection_has_no_sampling_variance() {
    // polish = 1.0 means the reflected ray direction is a pure deterministic reflection with
    // no random perturbation, so re-rendering the identical scene must reproduce every pixel.
    let a = render(mirror_scene(), 16, 16);
    let b = render(mirror_scene(), 16, 16);
    assert_eq!(a, b, "a perfect mirror has no stochastic scatter, so every sample agrees");
}

#[test]
fn dielectric_sphere_silhouette_differs_from_an_opaque_one() {
    let glass = sphere_at(-3.0, 1.0, Material::Dielectric { refraction_index: 1.5 });
    let opaque = sphere_at(-3.0, 1.0, Material::Diffuse(Texture::Solid(Color::new(0.2, 0.2, 0.2))));

    let background = Texture::Solid(Color::new(0.8, 0.8, 0.9));
    let glass_scene = Scene::validate(camera(1.0), background.clone(), vec![glass], 8, 8, true).unwrap();
    let opaque_scene = Scene::validate(camera(1.0), background, vec![opaque], 8, 8, true).unwrap();

    let glass_pixels = render(glass_scene, 24, 24);
    let opaque_pixels = render(opaque_scene, 24, 24);

    assert_ne!(
        glass_pixels, opaque_pixels,
        "refraction through glass must look different from a diffuse sphere of the same shape"
    );
}

#[test]
fn stopping_a_render_mid_flight_leaves_it_incomplete_but_joined() {
    let light = sphere_at(-3.0, 1.0, Material::Light(Texture::Solid(Color::ones())));
    let scene = Scene::validate(camera(1.0), Texture::Solid(Color::zero()), vec![light], 8, 32, true)
        .unwrap();

    let mut renderer = Renderer::new(256, 256, 4).unwrap();
    renderer.set_scene(scene).unwrap();
    renderer.start_render().unwrap();
    renderer.stop_render();

    assert!(!renderer.is_rendering());
    // A render stopped this early essentially never reaches 100%; we don't assert on the
    // exact percentage since it's a race against however far workers got before cancellation.
    assert!(renderer.render_percentage() <= 100.0);
}
