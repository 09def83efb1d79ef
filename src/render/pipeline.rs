use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlUniformLocation,
    WebGlVertexArrayObject,
};
use crate::field::{FLOATS_PER_INSTANCE, FLOATS_PER_PARTICLE};
use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use super::shaders::*;
use super::webgl::{RenderTarget, WebGLContext};

/// Cached uniform locations for the foliage point shader
struct FoliageUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size_scale: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the instanced ornament shader
struct OrnamentUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    light_dir: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for post-processing
struct PostUniforms {
    texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    texel: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_strength: Option<WebGlUniformLocation>,
}

/// One instanced ornament draw batch: shared mesh, per-instance transforms
struct InstancedBatch {
    vao: WebGlVertexArrayObject,
    // Kept alive alongside the VAO that references them
    _vertices: WebGlBuffer,
    _indices: WebGlBuffer,
    index_count: i32,
    instance_buffer: WebGlBuffer,
    /// Capacity in instances, fixed at registration
    capacity: usize,
    count: i32,
    color: Vec3,
    emissive: f32,
}

/// Complete render pipeline for the holiday tree scene
pub struct RenderPipeline {
    ctx: WebGLContext,

    // Shaders
    foliage_program: WebGlProgram,
    ornament_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    // Uniform locations
    foliage_uniforms: FoliageUniforms,
    ornament_uniforms: OrnamentUniforms,
    post_uniforms: PostUniforms,

    // Foliage point data
    foliage_vao: Option<WebGlVertexArrayObject>,
    foliage_buffer: Option<WebGlBuffer>,
    foliage_capacity: usize,
    foliage_count: i32,

    // Instanced ornament batches
    batches: Vec<InstancedBatch>,

    // Framebuffers for post-processing
    scene_target: Option<RenderTarget>,
    bloom_targets: [Option<RenderTarget>; 2],

    // Dimensions
    width: i32,
    height: i32,

    // Camera state
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov: f32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, FOLIAGE_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let foliage_uniforms = FoliageUniforms {
            view: ctx.get_uniform_location(&foliage_program, "u_view"),
            projection: ctx.get_uniform_location(&foliage_program, "u_projection"),
            size_scale: ctx.get_uniform_location(&foliage_program, "u_size_scale"),
        };

        let ornament_uniforms = OrnamentUniforms {
            view: ctx.get_uniform_location(&ornament_program, "u_view"),
            projection: ctx.get_uniform_location(&ornament_program, "u_projection"),
            color: ctx.get_uniform_location(&ornament_program, "u_color"),
            emissive: ctx.get_uniform_location(&ornament_program, "u_emissive"),
            light_dir: ctx.get_uniform_location(&ornament_program, "u_light_dir"),
            camera_pos: ctx.get_uniform_location(&ornament_program, "u_camera_pos"),
            time: ctx.get_uniform_location(&ornament_program, "u_time"),
        };

        let post_uniforms = PostUniforms {
            texture: ctx.get_uniform_location(&bloom_extract_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            blur_texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            texel: ctx.get_uniform_location(&blur_program, "u_texel"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_strength: ctx.get_uniform_location(&composite_program, "u_vignette_strength"),
        };

        let mut pipeline = Self {
            ctx,
            foliage_program,
            ornament_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            foliage_uniforms,
            ornament_uniforms,
            post_uniforms,
            foliage_vao: None,
            foliage_buffer: None,
            foliage_capacity: 0,
            foliage_count: 0,
            batches: Vec::new(),
            scene_target: None,
            bloom_targets: [None, None],
            width,
            height,
            camera_position: Vec3::new(0.0, 3.0, 18.0),
            camera_target: Vec3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
        };

        pipeline.create_render_targets()?;

        Ok(pipeline)
    }

    fn create_render_targets(&mut self) -> Result<(), String> {
        self.scene_target = Some(self.ctx.create_render_target(self.width, self.height)?);

        // Bloom works at half resolution
        let bloom_width = (self.width / 2).max(1);
        let bloom_height = (self.height / 2).max(1);
        for slot in &mut self.bloom_targets {
            *slot = Some(self.ctx.create_render_target(bloom_width, bloom_height)?);
        }

        Ok(())
    }

    /// Create the foliage point buffer sized for `data`, replacing any
    /// previous one
    pub fn upload_foliage(&mut self, data: &[f32]) -> Result<(), String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = self.ctx.create_buffer_f32(data, WebGl2RenderingContext::DYNAMIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));

        let stride = (FLOATS_PER_PARTICLE * 4) as i32;
        self.ctx.float_attrib(0, 3, stride, 0); // position
        self.ctx.float_attrib(1, 1, stride, 12); // size
        self.ctx.float_attrib(2, 1, stride, 16); // alpha
        self.ctx.float_attrib(3, 3, stride, 20); // color

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        self.foliage_vao = Some(vao);
        self.foliage_buffer = Some(buffer);
        self.foliage_capacity = data.len();
        self.foliage_count = (data.len() / FLOATS_PER_PARTICLE) as i32;

        Ok(())
    }

    /// Push this frame's foliage buffer to the GPU
    pub fn update_foliage(&mut self, data: &[f32]) -> Result<(), String> {
        match &self.foliage_buffer {
            Some(buffer) if data.len() <= self.foliage_capacity => {
                self.ctx.update_buffer_f32(buffer, data);
                self.foliage_count = (data.len() / FLOATS_PER_PARTICLE) as i32;
                Ok(())
            }
            _ => self.upload_foliage(data),
        }
    }

    /// Register an instanced ornament batch; returns its handle.
    ///
    /// Mesh geometry is uploaded once; the per-instance transform buffer is
    /// reserved at full capacity and refreshed by `update_instances`.
    pub fn add_instanced_batch(
        &mut self,
        mesh: &Mesh,
        capacity: usize,
        color: Vec3,
        emissive: f32,
    ) -> Result<usize, String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_data = mesh.vertex_data();
        let vertices = self.ctx.create_buffer_f32(&vertex_data, WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertices));
        self.ctx.float_attrib(0, 3, 24, 0); // position
        self.ctx.float_attrib(1, 3, 24, 12); // normal

        // Element binding is VAO state
        let indices = self.ctx.create_index_buffer(mesh.index_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&indices));

        let instance_buffer = self.ctx.allocate_buffer_f32(
            capacity * FLOATS_PER_INSTANCE,
            WebGl2RenderingContext::DYNAMIC_DRAW,
        )?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&instance_buffer));
        self.ctx.instanced_mat4_attrib(2);

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, None);

        self.batches.push(InstancedBatch {
            vao,
            _vertices: vertices,
            _indices: indices,
            index_count: mesh.index_count() as i32,
            instance_buffer,
            capacity,
            count: 0,
            color,
            emissive,
        });

        Ok(self.batches.len() - 1)
    }

    /// Drop all registered batches (scene rebuild)
    pub fn clear_batches(&mut self) {
        self.batches.clear();
    }

    /// Refresh one batch's transform buffer
    pub fn update_instances(&mut self, handle: usize, data: &[f32]) {
        let batch = &mut self.batches[handle];
        assert!(
            data.len() <= batch.capacity * FLOATS_PER_INSTANCE,
            "instance data exceeds registered capacity"
        );
        self.ctx.update_buffer_f32(&batch.instance_buffer, data);
        batch.count = (data.len() / FLOATS_PER_INSTANCE) as i32;
    }

    /// Render a frame
    pub fn render(&self, time: f32) {
        let gl = &self.ctx.gl;

        let aspect = self.width as f32 / self.height as f32;
        let projection = Mat4::perspective(self.fov, aspect, 0.1, 100.0);
        let view = Mat4::look_at(self.camera_position, self.camera_target, Vec3::UP);
        let light_dir = Vec3::new(0.4, 0.8, 0.45).normalize();

        // === Pass 1: scene into offscreen target ===
        let scene_fbo = self.scene_target.as_ref().map(|t| &t.framebuffer);
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, scene_fbo);
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.012, 0.016, 0.045, 1.0);
        self.ctx.enable_depth_test();
        self.ctx.disable_blending();

        // Solid ornaments first, depth-tested
        if self.batches.iter().any(|b| b.count > 0) {
            gl.use_program(Some(&self.ornament_program));
            self.ctx.uniform_matrix4fv(self.ornament_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(self.ornament_uniforms.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_3f(
                self.ornament_uniforms.light_dir.as_ref(),
                light_dir.x,
                light_dir.y,
                light_dir.z,
            );
            self.ctx.uniform_3f(
                self.ornament_uniforms.camera_pos.as_ref(),
                self.camera_position.x,
                self.camera_position.y,
                self.camera_position.z,
            );
            self.ctx.uniform_1f(self.ornament_uniforms.time.as_ref(), time);

            for batch in &self.batches {
                if batch.count == 0 {
                    continue;
                }
                self.ctx.uniform_3f(
                    self.ornament_uniforms.color.as_ref(),
                    batch.color.x,
                    batch.color.y,
                    batch.color.z,
                );
                self.ctx.uniform_1f(self.ornament_uniforms.emissive.as_ref(), batch.emissive);

                gl.bind_vertex_array(Some(&batch.vao));
                gl.draw_elements_instanced_with_i32(
                    WebGl2RenderingContext::TRIANGLES,
                    batch.index_count,
                    WebGl2RenderingContext::UNSIGNED_INT,
                    0,
                    batch.count,
                );
            }
            gl.bind_vertex_array(None);
        }

        // Foliage glow on top, additive and undepthed
        if self.foliage_vao.is_some() && self.foliage_count > 0 {
            gl.use_program(Some(&self.foliage_program));
            self.ctx.disable_depth_test();
            self.ctx.enable_additive_blending();

            self.ctx.uniform_matrix4fv(self.foliage_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(self.foliage_uniforms.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_1f(
                self.foliage_uniforms.size_scale.as_ref(),
                self.height as f32 / 720.0,
            );

            gl.bind_vertex_array(self.foliage_vao.as_ref());
            gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, self.foliage_count);
            gl.bind_vertex_array(None);
        }

        self.ctx.disable_depth_test();
        self.ctx.disable_blending();

        let bloom_width = (self.width / 2).max(1);
        let bloom_height = (self.height / 2).max(1);

        // === Pass 2: extract bright regions at half resolution ===
        gl.bind_framebuffer(
            WebGl2RenderingContext::FRAMEBUFFER,
            self.bloom_targets[0].as_ref().map(|t| &t.framebuffer),
        );
        self.ctx.viewport(0, 0, bloom_width, bloom_height);

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(
            WebGl2RenderingContext::TEXTURE_2D,
            self.scene_target.as_ref().map(|t| &t.texture),
        );
        self.ctx.uniform_1i(self.post_uniforms.texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), 0.45);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Passes 3/4: separable blur ping-pong ===
        gl.use_program(Some(&self.blur_program));
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);
        self.ctx.uniform_2f(
            self.post_uniforms.texel.as_ref(),
            1.0 / bloom_width as f32,
            1.0 / bloom_height as f32,
        );

        gl.bind_framebuffer(
            WebGl2RenderingContext::FRAMEBUFFER,
            self.bloom_targets[1].as_ref().map(|t| &t.framebuffer),
        );
        gl.bind_texture(
            WebGl2RenderingContext::TEXTURE_2D,
            self.bloom_targets[0].as_ref().map(|t| &t.texture),
        );
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 1.0, 0.0);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        gl.bind_framebuffer(
            WebGl2RenderingContext::FRAMEBUFFER,
            self.bloom_targets[0].as_ref().map(|t| &t.framebuffer),
        );
        gl.bind_texture(
            WebGl2RenderingContext::TEXTURE_2D,
            self.bloom_targets[1].as_ref().map(|t| &t.texture),
        );
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 0.0, 1.0);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 5: composite to the canvas ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);

        gl.use_program(Some(&self.composite_program));
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(
            WebGl2RenderingContext::TEXTURE_2D,
            self.scene_target.as_ref().map(|t| &t.texture),
        );
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(WebGl2RenderingContext::TEXTURE1);
        gl.bind_texture(
            WebGl2RenderingContext::TEXTURE_2D,
            self.bloom_targets[0].as_ref().map(|t| &t.texture),
        );
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx.uniform_1f(self.post_uniforms.bloom_strength.as_ref(), 0.85);
        self.ctx.uniform_1f(self.post_uniforms.vignette_strength.as_ref(), 0.35);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        self.create_render_targets()
    }
}
