//! The concurrent worker-pool renderer.
//!
//! Workers pull disjoint row ranges from a shared atomic counter (work-stealing rather than a
//! static split, so a thread that finishes a cheap chunk immediately picks up the next one
//! instead of idling) and write directly into a lock-free pixel buffer — each worker only ever
//! touches rows no other worker will touch, so [`std::sync::atomic::AtomicU32`] with `Relaxed`
//! ordering is enough; there is no read-modify-write race to guard against.
//!
//! The render loop itself never produces an [`crate::error::EngineError`] — a cancelled or
//! still-running render simply shows up as [`Renderer::render_percentage`] short of 100.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::color::{self, Color};
use crate::error::{EngineError, EngineResult};
use crate::integrator::PathIntegrator;
use crate::scene::Scene;

/// Rows handed to a worker per `fetch_add`. Small enough that one slow worker's last chunk
/// doesn't stall the others near the end of a frame, large enough to keep atomic contention low.
const CHUNK: usize = 10;

/// Folds pixel coordinates into a render seed (SplitMix64) so each pixel's RNG stream depends
/// only on `(seed, x, y)`, never on which worker happened to claim its row.
fn pixel_seed(seed: u64, x: usize, y: usize) -> u64 {
    let mut z = seed
        .wrapping_add((x as u64).wrapping_mul(0x9E3779B97F4A7C15))
        .wrapping_add((y as u64).wrapping_mul(0xC2B2AE3D27D4EB4F));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Owns the pixel buffer and worker pool for one render target. `width`/`height` are fixed at
/// construction; call [`Renderer::set_scene`] before [`Renderer::start_render`].
pub struct Renderer {
    width: usize,
    height: usize,
    pixels: Arc<Vec<AtomicU32>>,
    scene: Option<Arc<Scene>>,
    next_row: Arc<AtomicUsize>,
    cancel_flag: Arc<AtomicBool>,
    running_workers: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
    thread_count: usize,
    /// When set, each pixel seeds its RNG from `(seed, x, y)` instead of OS entropy, making
    /// renders of the same scene and dimensions bit-reproducible regardless of thread count or
    /// how rows happen to be claimed — the mode scenario tests and golden-image comparisons
    /// rely on this.
    seed: Option<u64>,
    start_time: Option<Instant>,
    last_duration: Option<Duration>,
    /// When set, every worker renders as if `scene.samples_per_pixel` and `scene.max_ray_depth`
    /// were both 1, regardless of what the installed scene actually specifies — a fast, noisy
    /// mode meant for camera motion, orthogonal to the row-scheduling contract.
    coarse_preview: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize, thread_count: usize) -> EngineResult<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::invalid_argument(
                "renderer dimensions must be non-zero",
            ));
        }
        if thread_count == 0 {
            return Err(EngineError::invalid_argument(
                "renderer needs at least one worker thread",
            ));
        }

        let pixels = Arc::new((0..width * height).map(|_| AtomicU32::new(0)).collect());

        Ok(Self {
            width,
            height,
            pixels,
            scene: None,
            next_row: Arc::new(AtomicUsize::new(0)),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            running_workers: Arc::new(AtomicUsize::new(0)),
            workers: Vec::new(),
            thread_count,
            seed: None,
            start_time: None,
            last_duration: None,
            coarse_preview: false,
        })
    }

    /// Switches the renderer into deterministic mode, seeding each pixel's RNG from `(seed,
    /// x, y)` instead of OS entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Toggles coarse-preview mode: while enabled, every subsequent [`Renderer::start_render`]
    /// renders at `samples_per_pixel = 1`, `max_ray_depth = 1` regardless of the installed
    /// scene's own quality knobs. Safe to call at any time, including mid-render — it only takes
    /// effect on the next `start_render`.
    pub fn set_coarse_preview(&mut self, enabled: bool) {
        self.coarse_preview = enabled;
    }

    pub fn coarse_preview(&self) -> bool {
        self.coarse_preview
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Installs the scene to render. Fails if a render is currently in progress.
    pub fn set_scene(&mut self, scene: Scene) -> EngineResult<()> {
        if self.is_rendering() {
            return Err(EngineError::invalid_state(
                "cannot set_scene while a render is in progress",
            ));
        }
        self.scene = Some(Arc::new(scene));
        Ok(())
    }

    /// Zeroes the pixel buffer. Safe to call mid-render, though the result will be immediately
    /// overwritten by whatever rows workers are still producing.
    pub fn clear(&self) {
        for pixel in self.pixels.iter() {
            pixel.store(0, Ordering::Relaxed);
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.running_workers.load(Ordering::Acquire) > 0
    }

    /// Fraction of rows claimed by a worker so far, `0.0..=100.0`. Claimed is not the same as
    /// *written* — a worker may still be partway through a claimed chunk — so this is a lower
    /// bound on visual completeness, not an exact pixel count.
    pub fn render_percentage(&self) -> f64 {
        let claimed = self.next_row.load(Ordering::Relaxed).min(self.height);
        100.0 * claimed as f64 / self.height as f64
    }

    /// Snapshots the current pixel buffer as packed RGBA8. Safe to call at any time, including
    /// mid-render, for incremental preview.
    pub fn pixels(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.load(Ordering::Relaxed)).collect()
    }

    /// Spawns the worker pool and returns immediately; workers run until every row is claimed,
    /// [`Renderer::stop_render`] is called, or the renderer is dropped.
    pub fn start_render(&mut self) -> EngineResult<()> {
        if self.is_rendering() {
            return Err(EngineError::invalid_state("render already in progress"));
        }
        let scene = self
            .scene
            .clone()
            .ok_or_else(|| EngineError::invalid_state("start_render called with no scene set"))?;

        self.next_row.store(0, Ordering::SeqCst);
        self.cancel_flag.store(false, Ordering::SeqCst);
        self.start_time = Some(Instant::now());
        self.last_duration = None;

        info!(
            width = self.width,
            height = self.height,
            threads = self.thread_count,
            samples_per_pixel = scene.samples_per_pixel,
            "starting render"
        );

        for worker_index in 0..self.thread_count {
            self.running_workers.fetch_add(1, Ordering::SeqCst);

            let pixels = Arc::clone(&self.pixels);
            let scene = Arc::clone(&scene);
            let next_row = Arc::clone(&self.next_row);
            let cancel_flag = Arc::clone(&self.cancel_flag);
            let running_workers = Arc::clone(&self.running_workers);
            let (width, height) = (self.width, self.height);
            let seed = self.seed;
            let (samples_per_pixel, max_ray_depth) = if self.coarse_preview {
                (1, 1)
            } else {
                (scene.samples_per_pixel, scene.max_ray_depth)
            };

            let handle = std::thread::spawn(move || {
                while !cancel_flag.load(Ordering::Relaxed) {
                    let start_row = next_row.fetch_add(CHUNK, Ordering::SeqCst);
                    if start_row >= height {
                        break;
                    }
                    let end_row = (start_row + CHUNK).min(height);

                    for y in start_row..end_row {
                        if cancel_flag.load(Ordering::Relaxed) {
                            break;
                        }
                        for x in 0..width {
                            // Seeded per pixel rather than per worker: which worker claims which
                            // row is a race against `next_row`, so a per-worker stream would make
                            // a pixel's samples depend on thread scheduling instead of only on
                            // `seed`.
                            let mut rng = match seed {
                                Some(seed) => SmallRng::seed_from_u64(pixel_seed(seed, x, y)),
                                None => SmallRng::from_entropy(),
                            };

                            let mut accumulated = Color::zero();
                            for _ in 0..samples_per_pixel {
                                let s = (x as f64 + rng.gen::<f64>()) / width as f64;
                                let t = 1.0 - (y as f64 + rng.gen::<f64>()) / height as f64;
                                let ray = scene.camera.get_ray(s, t, &mut rng);
                                accumulated +=
                                    PathIntegrator::trace(&scene, &ray, max_ray_depth, 0, &mut rng);
                            }
                            let averaged = accumulated / samples_per_pixel as f64;
                            pixels[y * width + x].store(color::to_rgba(averaged), Ordering::Relaxed);
                        }
                    }

                    debug!(worker_index, start_row, end_row, "chunk complete");
                }

                running_workers.fetch_sub(1, Ordering::SeqCst);
            });

            self.workers.push(handle);
        }

        Ok(())
    }

    /// Signals every worker to stop after its current pixel and blocks until they've exited.
    pub fn stop_render(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        self.wait_for_render_completion();
    }

    /// Blocks until every worker has exited, whether by finishing the image or by cancellation.
    pub fn wait_for_render_completion(&mut self) {
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        if let Some(start) = self.start_time.take() {
            let elapsed = start.elapsed();
            info!(elapsed_secs = elapsed.as_secs_f64(), "render finished");
            self.last_duration = Some(elapsed);
        }
    }

    pub fn last_render_duration(&self) -> Option<Duration> {
        self.last_duration
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if self.is_rendering() {
            self.stop_render();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, CameraConfig};
    use crate::material::Material;
    use crate::math::{Point3, Vec3};
    use crate::object::{Object, Shape};
    use crate::texture::Texture;
    use crate::transform::Transform;

    fn scene() -> Scene {
        let camera = Camera::new(&CameraConfig {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::zero(),
            orientation: Vec3::unit_y(),
            vertical_fov_degrees: 40.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_distance: 5.0,
        });
        let light = Object::new(
            Transform::new(Point3::new(0.0, 0.0, -3.0), Vec3::zero(), Vec3::ones()).unwrap(),
            Material::Light(Texture::Solid(Color::ones())),
            Shape::Sphere { radius: 2.0 },
        );
        Scene::validate(camera, Texture::Solid(Color::zero()), vec![light], 4, 2, true).unwrap()
    }

    #[test]
    fn renders_every_pixel_to_completion() {
        let mut renderer = Renderer::new(16, 12, 2).unwrap();
        renderer.set_scene(scene()).unwrap();
        renderer.start_render().unwrap();
        renderer.wait_for_render_completion();
        assert!(!renderer.is_rendering());
        assert_eq!(renderer.render_percentage(), 100.0);
        assert!(renderer.pixels().iter().any(|&p| p != 0));
    }

    #[test]
    fn stop_render_cancels_before_completion_and_joins_cleanly() {
        let mut renderer = Renderer::new(64, 64, 4).unwrap();
        renderer.set_scene(scene()).unwrap();
        renderer.start_render().unwrap();
        renderer.stop_render();
        assert!(!renderer.is_rendering());
    }

    #[test]
    fn start_render_without_a_scene_is_rejected() {
        let mut renderer = Renderer::new(4, 4, 1).unwrap();
        assert!(renderer.start_render().is_err());
    }

    #[test]
    fn start_render_while_already_running_is_rejected() {
        let mut renderer = Renderer::new(32, 32, 2).unwrap();
        renderer.set_scene(scene()).unwrap();
        renderer.start_render().unwrap();
        let err = renderer.start_render();
        renderer.stop_render();
        assert!(err.is_err());
    }

    #[test]
    fn seeded_renders_of_the_same_scene_are_bit_reproducible() {
        let mut a = Renderer::new(8, 8, 3).unwrap().with_seed(42);
        a.set_scene(scene()).unwrap();
        a.start_render().unwrap();
        a.wait_for_render_completion();

        let mut b = Renderer::new(8, 8, 3).unwrap().with_seed(42);
        b.set_scene(scene()).unwrap();
        b.start_render().unwrap();
        b.wait_for_render_completion();

        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn seeded_renders_are_reproducible_regardless_of_thread_count() {
        // A pixel's sampling must depend only on `(seed, x, y)`, not on which worker's row-chunk
        // race happens to claim it, so thread count must not change the result.
        let mut a = Renderer::new(8, 8, 1).unwrap().with_seed(7);
        a.set_scene(scene()).unwrap();
        a.start_render().unwrap();
        a.wait_for_render_completion();

        let mut b = Renderer::new(8, 8, 4).unwrap().with_seed(7);
        b.set_scene(scene()).unwrap();
        b.start_render().unwrap();
        b.wait_for_render_completion();

        assert_eq!(a.pixels(), b.pixels());
    }
}
