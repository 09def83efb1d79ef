/// Vertex shader for foliage point sprites
///
/// Point size combines the CPU-packed seed/pixel-ratio size with
/// perspective attenuation against a 10-unit reference depth.
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size_scale;

out float v_alpha;
out vec3 v_color;

const float REF_DEPTH = 10.0;

void main() {
    vec4 view_pos = u_view * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    float depth = max(-view_pos.z, 0.5);
    gl_PointSize = clamp(a_size * u_size_scale * (REF_DEPTH / depth), 1.0, 64.0);
    v_alpha = a_alpha;
    v_color = a_color;
}
"#;

/// Fragment shader for foliage point sprites: soft round glow discs
pub const FOLIAGE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    vec2 offset = gl_PointCoord - vec2(0.5);
    float dist = length(offset) * 2.0;
    if (dist > 1.0) {
        discard;
    }
    float falloff = 1.0 - dist;
    float glow = falloff * falloff;
    fragColor = vec4(v_color, v_alpha * glow);
}
"#;

/// Vertex shader for instanced ornaments
///
/// The per-instance model matrix arrives as four vec4 attributes starting
/// at location 2. Uniform per-instance scale keeps the rotated normal
/// valid after normalization.
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in mat4 a_model;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;
out vec3 v_world_position;

void main() {
    vec4 world_pos = a_model * vec4(a_position, 1.0);
    v_world_position = world_pos.xyz;
    v_normal = normalize(mat3(a_model) * a_normal);
    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for ornaments: lambert with rim light and an emissive
/// core for the light-string pieces
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world_position;

uniform vec3 u_color;
uniform float u_emissive;
uniform vec3 u_light_dir;
uniform vec3 u_camera_pos;
uniform float u_time;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 to_camera = normalize(u_camera_pos - v_world_position);

    float diffuse = max(dot(normal, u_light_dir), 0.0);
    float rim = pow(1.0 - max(dot(normal, to_camera), 0.0), 2.5);

    vec3 lit = u_color * (0.25 + 0.75 * diffuse) + vec3(0.9, 0.95, 1.0) * rim * 0.25;

    // Emissive pieces glow on their own, with a slow shimmer
    float shimmer = 0.85 + 0.15 * sin(u_time * 2.0 + v_world_position.y * 3.0);
    vec3 color = mix(lit, u_color * 1.6 * shimmer, u_emissive);

    fragColor = vec4(color, 1.0);
}
"#;

/// Fullscreen triangle without vertex buffers
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    // Oversized triangle covering the viewport
    vec2 corners[3] = vec2[3](vec2(-1.0, -1.0), vec2(3.0, -1.0), vec2(-1.0, 3.0));
    vec2 pos = corners[gl_VertexID];
    v_uv = pos * 0.5 + 0.5;
    gl_Position = vec4(pos, 0.0, 1.0);
}
"#;

/// Extract pixels above the bloom threshold
pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float brightness = dot(color, vec3(0.2126, 0.7152, 0.0722));
    float keep = smoothstep(u_threshold, u_threshold + 0.3, brightness);
    fragColor = vec4(color * keep, 1.0);
}
"#;

/// Separable gaussian blur; run once horizontally, once vertically
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;
uniform vec2 u_texel;

out vec4 fragColor;

void main() {
    float weights[5] = float[5](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    vec2 step = u_direction * u_texel;

    vec3 sum = texture(u_texture, v_uv).rgb * weights[0];
    for (int i = 1; i < 5; i++) {
        vec2 offset = step * float(i);
        sum += texture(u_texture, v_uv + offset).rgb * weights[i];
        sum += texture(u_texture, v_uv - offset).rgb * weights[i];
    }
    fragColor = vec4(sum, 1.0);
}
"#;

/// Composite scene + bloom with vignette
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_strength;

out vec4 fragColor;

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = scene + bloom * u_bloom_strength;

    // Soft reinhard rolloff keeps stacked glow from clipping
    color = color / (color + vec3(0.8));
    color = pow(color, vec3(0.85));

    float vignette = 1.0 - u_vignette_strength * smoothstep(0.4, 1.2, length(v_uv - 0.5) * 1.6);
    fragColor = vec4(color * vignette, 1.0);
}
"#;
