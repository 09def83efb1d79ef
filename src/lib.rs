use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, HtmlCanvasElement};

pub mod animation;
pub mod field;
pub mod math;
pub mod mesh;
pub mod render;
pub mod sampling;
pub mod scene;

use animation::MorphDriver;
use field::{FoliageField, OrnamentField, StarMarker};
use math::Vec3;
use mesh::Mesh;
use render::RenderPipeline;
use scene::{FrameContext, Mode, OrnamentShape, SceneConfig};

const FOLIAGE_SEED: u32 = 42;
const ORNAMENT_SEED: u32 = 12345;
const STAR_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.35);

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct GlimmerTree {
    pipeline: RenderPipeline,
    driver: MorphDriver,
    foliage: FoliageField,
    /// (pipeline batch handle, field) per ornament group
    ornaments: Vec<(usize, OrnamentField)>,
    star: StarMarker,
    star_handle: usize,
    mode: Mode,
    config: SceneConfig,
    time: f32,
    width: i32,
    height: i32,
    pixel_ratio: f32,
    // Camera orbit controls
    camera_distance: f32,
    camera_angle_x: f32,
    camera_angle_y: f32,
    camera_target: Vec3,
}

#[wasm_bindgen]
impl GlimmerTree {
    /// Create a new engine instance with the default scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<GlimmerTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let pipeline = RenderPipeline::new(gl, width, height)
            .map_err(|e| JsValue::from_str(&e))?;

        let pixel_ratio = device_pixel_ratio();
        let config = SceneConfig::default();

        let mut tree = Self {
            pipeline,
            driver: MorphDriver::default(),
            foliage: FoliageField::new(0, config.foliage.base_size, &config.tree, FOLIAGE_SEED),
            ornaments: Vec::new(),
            star: StarMarker::new(&config.star, &config.tree),
            star_handle: 0,
            mode: Mode::Scattered,
            config: SceneConfig::default(),
            time: 0.0,
            width,
            height,
            pixel_ratio,
            camera_distance: 24.0,
            camera_angle_x: 0.25,
            camera_angle_y: 0.0,
            camera_target: Vec3::new(0.0, 1.0, 0.0),
        };

        tree.build_scene(config).map_err(|e| JsValue::from_str(&e))?;
        Ok(tree)
    }

    /// Load a scene description from YAML, replacing all fields.
    ///
    /// The morph state is kept, so a reload mid-transition continues from
    /// the same progress.
    #[wasm_bindgen]
    pub fn load_scene(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml)
            .map_err(|e| JsValue::from_str(&e))?;
        self.build_scene(config).map_err(|e| JsValue::from_str(&e))
    }

    fn build_scene(&mut self, config: SceneConfig) -> Result<(), String> {
        self.pipeline.clear_batches();
        self.ornaments.clear();

        self.foliage = FoliageField::new(
            config.foliage.count,
            config.foliage.base_size,
            &config.tree,
            FOLIAGE_SEED,
        );
        self.pipeline.upload_foliage(self.foliage.particle_data())?;

        for (i, group) in config.ornaments.iter().enumerate() {
            let mesh = ornament_mesh(group.shape);
            let emissive = if group.emissive { 1.0 } else { 0.0 };
            let handle = self
                .pipeline
                .add_instanced_batch(&mesh, group.count, group.color, emissive)?;
            let field = OrnamentField::new(
                group,
                &config.tree,
                ORNAMENT_SEED.wrapping_add(i as u32 * 7919),
            );
            self.ornaments.push((handle, field));
        }

        self.star = StarMarker::new(&config.star, &config.tree);
        self.star_handle = self.pipeline.add_instanced_batch(
            &ornament_mesh(OrnamentShape::Octahedron),
            1,
            STAR_COLOR,
            1.0,
        )?;

        web_sys::console::log_1(
            &format!(
                "glimmer-tree scene: {} foliage particles, {} ornament groups, {} elements total",
                config.foliage.count,
                config.ornaments.len(),
                config.element_count()
            )
            .into(),
        );

        self.config = config;
        Ok(())
    }

    /// Update and render a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        self.time += dt;

        // Progress is written once here, then read by every field below
        self.driver.tick(self.mode.target(), dt);
        let ctx = FrameContext::new(self.time, dt, self.pixel_ratio, self.driver.progress());

        self.foliage.update(&ctx);
        if !self.foliage.is_empty() {
            if let Err(e) = self.pipeline.update_foliage(self.foliage.particle_data()) {
                web_sys::console::warn_1(&format!("foliage upload failed: {}", e).into());
            }
        }

        for (handle, field) in &mut self.ornaments {
            field.update(&ctx);
            if field.take_dirty() {
                self.pipeline.update_instances(*handle, field.transform_data());
            }
        }

        self.star.update(&ctx);
        if self.star.take_dirty() {
            self.pipeline
                .update_instances(self.star_handle, self.star.transform_data());
        }

        // Update camera position from orbit angles
        let cos_x = self.camera_angle_x.cos();
        let sin_x = self.camera_angle_x.sin();
        let cos_y = self.camera_angle_y.cos();
        let sin_y = self.camera_angle_y.sin();

        self.pipeline.camera_position = Vec3::new(
            self.camera_target.x + self.camera_distance * cos_x * sin_y,
            self.camera_target.y + self.camera_distance * sin_x,
            self.camera_target.z + self.camera_distance * cos_x * cos_y,
        );
        self.pipeline.camera_target = self.camera_target;

        self.pipeline.render(self.time);
    }

    // === Mode controls ===

    /// Aim the morph at the tree shape (true) or the scatter shell (false).
    ///
    /// Flipping mid-transition is always continuous: the damper just
    /// chases the new target.
    #[wasm_bindgen]
    pub fn set_assembled(&mut self, assembled: bool) {
        self.mode = if assembled {
            Mode::TreeShape
        } else {
            Mode::Scattered
        };
    }

    /// Flip the current mode; returns true when now heading to the tree
    #[wasm_bindgen]
    pub fn toggle_mode(&mut self) -> bool {
        self.mode = self.mode.toggled();
        self.mode == Mode::TreeShape
    }

    #[wasm_bindgen]
    pub fn is_assembled(&self) -> bool {
        self.mode == Mode::TreeShape
    }

    /// Current morph progress (0.0 scattered, 1.0 assembled)
    #[wasm_bindgen]
    pub fn get_progress(&self) -> f32 {
        self.driver.progress()
    }

    /// Skip the transition and land on the current mode's endpoint
    #[wasm_bindgen]
    pub fn complete_morph(&mut self) {
        self.driver.snap(self.mode.target());
    }

    /// Total animated element count in the loaded scene
    #[wasm_bindgen]
    pub fn element_count(&self) -> u32 {
        self.config.element_count() as u32
    }

    // === Host window plumbing ===

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.width = width;
        self.height = height;
        self.pixel_ratio = device_pixel_ratio();
        self.pipeline.resize(width, height)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Orbit camera
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.camera_angle_y += delta_x * 0.01;
        self.camera_angle_x = (self.camera_angle_x + delta_y * 0.01)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.1, std::f32::consts::FRAC_PI_2 - 0.1);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.camera_distance = (self.camera_distance + delta * 0.5).clamp(8.0, 60.0);
    }

    /// Pan camera target
    #[wasm_bindgen]
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        // Pan in camera-relative space
        let right = Vec3::new(
            self.camera_angle_y.cos(),
            0.0,
            -self.camera_angle_y.sin(),
        );
        let up = Vec3::UP;

        self.camera_target = self.camera_target
            + right.scale(-delta_x * 0.01)
            + up.scale(delta_y * 0.01);
    }
}

fn ornament_mesh(shape: OrnamentShape) -> Mesh {
    match shape {
        OrnamentShape::Cube => mesh::cube(),
        OrnamentShape::Sphere => mesh::uv_sphere(16, 12),
        OrnamentShape::Octahedron => mesh::octahedron(),
    }
}

fn device_pixel_ratio() -> f32 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
}
