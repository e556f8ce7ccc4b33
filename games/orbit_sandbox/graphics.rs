use std::mem;

use glam::{Vec2, Vec4};
use orbitsim::engine::{Camera2D, MaterialId};
use sokol::gfx as sg;
use tracing::{info, warn};

use crate::texture::TextureManager;

pub const MAX_SPRITES: usize = 4096;
const VERTS_PER_SPRITE: usize = 4;
const INDICES_PER_SPRITE: usize = 6;

#[repr(C)]
struct Vertex {
    pos: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
}

/// Textured quad in screen pixels, centred on `center`.
#[derive(Copy, Clone, Debug)]
pub struct Sprite {
    pub center: Vec2,
    pub size: Vec2,
    pub material: MaterialId,
    pub color: Vec4,
}

impl Sprite {
    pub fn new(center: Vec2, size: Vec2, material: MaterialId) -> Self {
        Self {
            center,
            size,
            material,
            color: Vec4::ONE,
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }
}

/// Consecutive sprites sharing a material, drawn with one call.
struct Batch {
    material: MaterialId,
    first_index: usize,
    index_count: usize,
}

pub struct Renderer {
    pipeline: sg::Pipeline,
    bind: sg::Bindings,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    batches: Vec<Batch>,
    dropped: usize,
    ready: bool,
}

/// Implementation for new, init, flush.
impl Renderer {
    pub fn new() -> Self {
        Self {
            pipeline: sg::Pipeline::default(),
            bind: sg::Bindings::default(),
            vertices: Vec::with_capacity(MAX_SPRITES * VERTS_PER_SPRITE),
            indices: Vec::with_capacity(MAX_SPRITES * INDICES_PER_SPRITE),
            batches: Vec::new(),
            dropped: 0,
            ready: false,
        }
    }

    pub fn init(&mut self) {
        let backend = sg::query_backend();
        let Some(shader_desc) = shader_desc(backend) else {
            warn!("no sprite shader for backend {:?}, nothing will be drawn", backend);
            return;
        };
        let shader = sg::make_shader(&shader_desc);

        let mut pipeline = sg::PipelineDesc::new();
        pipeline.shader = shader;
        pipeline.layout.attrs[0].format = sg::VertexFormat::Float2; // position
        pipeline.layout.attrs[1].format = sg::VertexFormat::Float2; // uv
        pipeline.layout.attrs[2].format = sg::VertexFormat::Float4; // color
        pipeline.index_type = sg::IndexType::Uint16;
        pipeline.colors[0].blend = sg::BlendState {
            enabled: true,
            src_factor_rgb: sg::BlendFactor::SrcAlpha,
            dst_factor_rgb: sg::BlendFactor::OneMinusSrcAlpha,
            src_factor_alpha: sg::BlendFactor::One,
            dst_factor_alpha: sg::BlendFactor::OneMinusSrcAlpha,
            ..Default::default()
        };
        self.pipeline = sg::make_pipeline(&pipeline);

        self.bind.vertex_buffers[0] = sg::make_buffer(&sg::BufferDesc {
            size: MAX_SPRITES * VERTS_PER_SPRITE * mem::size_of::<Vertex>(),
            usage: sg::BufferUsage {
                vertex_buffer: true,
                stream_update: true,
                ..Default::default()
            },
            ..Default::default()
        });
        self.bind.index_buffer = sg::make_buffer(&sg::BufferDesc {
            size: MAX_SPRITES * INDICES_PER_SPRITE * mem::size_of::<u16>(),
            usage: sg::BufferUsage {
                index_buffer: true,
                stream_update: true,
                ..Default::default()
            },
            ..Default::default()
        });
        self.bind.samplers[0] = sg::make_sampler(&sg::SamplerDesc {
            min_filter: sg::Filter::Linear,
            mag_filter: sg::Filter::Linear,
            wrap_u: sg::Wrap::ClampToEdge,
            wrap_v: sg::Wrap::ClampToEdge,
            ..Default::default()
        });

        self.ready = true;
        info!("sprite renderer initialized ({:?})", backend);
    }

    /// Upload everything queued this frame and draw it in screen space.
    /// Must run inside a render pass.
    pub fn flush(&mut self, camera: &Camera2D, textures: &TextureManager) {
        if self.dropped > 0 {
            warn!("sprite budget exceeded, dropped {} sprites", self.dropped);
        }
        if self.ready && !self.vertices.is_empty() {
            sg::update_buffer(
                self.bind.vertex_buffers[0],
                &sg::Range {
                    ptr: self.vertices.as_ptr() as *const _,
                    size: self.vertices.len() * mem::size_of::<Vertex>(),
                },
            );
            sg::update_buffer(
                self.bind.index_buffer,
                &sg::Range {
                    ptr: self.indices.as_ptr() as *const _,
                    size: self.indices.len() * mem::size_of::<u16>(),
                },
            );

            let uniforms = Uniforms {
                mvp: camera.screen_projection().to_cols_array_2d(),
            };

            sg::apply_pipeline(self.pipeline);
            for batch in &self.batches {
                self.bind.images[0] = textures.image(batch.material);
                sg::apply_bindings(&self.bind);
                sg::apply_uniforms(
                    0,
                    &sg::Range {
                        ptr: &uniforms as *const _ as *const _,
                        size: mem::size_of::<Uniforms>(),
                    },
                );
                sg::draw(batch.first_index, batch.index_count, 1);
            }
        }

        self.vertices.clear();
        self.indices.clear();
        self.batches.clear();
        self.dropped = 0;
    }
}

/// Implementation for drawing to the screen used by the game
impl Renderer {
    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        if self.vertices.len() / VERTS_PER_SPRITE >= MAX_SPRITES {
            self.dropped += 1;
            return;
        }

        let start_vertex = self.vertices.len() as u16;
        let half = sprite.size * 0.5;
        let (x1, y1) = (sprite.center.x - half.x, sprite.center.y - half.y);
        let (x2, y2) = (sprite.center.x + half.x, sprite.center.y + half.y);
        let color = sprite.color.to_array();

        // y grows downwards, so v = 0 is the top edge of the image
        self.vertices.push(Vertex { pos: [x1, y1], uv: [0.0, 0.0], color });
        self.vertices.push(Vertex { pos: [x2, y1], uv: [1.0, 0.0], color });
        self.vertices.push(Vertex { pos: [x2, y2], uv: [1.0, 1.0], color });
        self.vertices.push(Vertex { pos: [x1, y2], uv: [0.0, 1.0], color });

        let first_index = self.indices.len();
        self.indices.extend_from_slice(&[
            start_vertex,
            start_vertex + 1,
            start_vertex + 2,
            start_vertex,
            start_vertex + 2,
            start_vertex + 3,
        ]);

        match self.batches.last_mut() {
            Some(batch) if batch.material == sprite.material => {
                batch.index_count += INDICES_PER_SPRITE;
            }
            _ => self.batches.push(Batch {
                material: sprite.material,
                first_index,
                index_count: INDICES_PER_SPRITE,
            }),
        }
    }
}

fn shader_desc(backend: sg::Backend) -> Option<sg::ShaderDesc> {
    let mut desc = sg::ShaderDesc::new();
    match backend {
        sg::Backend::Glcore => {
            desc.vertex_func.source = c"#version 410
uniform mat4 mvp;
layout(location=0) in vec2 position;
layout(location=1) in vec2 texcoord0;
layout(location=2) in vec4 color0;
out vec2 uv;
out vec4 color;
void main() {
    gl_Position = mvp * vec4(position, 0.0, 1.0);
    uv = texcoord0;
    color = color0;
}
"
            .as_ptr();
            desc.fragment_func.source = c"#version 410
uniform sampler2D tex;
in vec2 uv;
in vec4 color;
out vec4 frag_color;
void main() {
    frag_color = texture(tex, uv) * color;
}
"
            .as_ptr();
            desc.attrs[0].glsl_name = c"position".as_ptr();
            desc.attrs[1].glsl_name = c"texcoord0".as_ptr();
            desc.attrs[2].glsl_name = c"color0".as_ptr();
            let mvp = &mut desc.uniform_blocks[0].glsl_uniforms[0];
            mvp._type = sg::UniformType::Mat4;
            mvp.array_count = 1;
            mvp.glsl_name = c"mvp".as_ptr();
            desc.image_sampler_pairs[0].glsl_name = c"tex".as_ptr();
        }
        sg::Backend::D3d11 => {
            desc.vertex_func.source = c"
cbuffer uniforms : register(b0) {
    float4x4 mvp;
};

struct vs_in {
    float2 position : POSITION;
    float2 uv       : TEXCOORD;
    float4 color    : COLOR;
};

struct vs_out {
    float2 uv       : TEXCOORD0;
    float4 color    : COLOR0;
    float4 position : SV_Position;
};

vs_out main(vs_in inp) {
    vs_out outp;
    outp.position = mul(mvp, float4(inp.position, 0.0, 1.0));
    outp.uv = inp.uv;
    outp.color = inp.color;
    return outp;
}
"
            .as_ptr();
            desc.fragment_func.source = c"
Texture2D<float4> tex : register(t0);
SamplerState smp : register(s0);

float4 main(float2 uv : TEXCOORD0, float4 color : COLOR0) : SV_Target0 {
    return tex.Sample(smp, uv) * color;
}
"
            .as_ptr();
            desc.attrs[0].hlsl_sem_name = c"POSITION".as_ptr();
            desc.attrs[1].hlsl_sem_name = c"TEXCOORD".as_ptr();
            desc.attrs[2].hlsl_sem_name = c"COLOR".as_ptr();
            desc.uniform_blocks[0].hlsl_register_b_n = 0;
            desc.images[0].hlsl_register_t_n = 0;
            desc.samplers[0].hlsl_register_s_n = 0;
        }
        _ => return None,
    }

    desc.uniform_blocks[0].stage = sg::ShaderStage::Vertex;
    desc.uniform_blocks[0].size = mem::size_of::<Uniforms>() as u32;

    desc.images[0].stage = sg::ShaderStage::Fragment;
    desc.images[0].image_type = sg::ImageType::Dim2;
    desc.images[0].sample_type = sg::ImageSampleType::Float;
    desc.samplers[0].stage = sg::ShaderStage::Fragment;
    desc.samplers[0].sampler_type = sg::SamplerType::Filtering;
    desc.image_sampler_pairs[0].stage = sg::ShaderStage::Fragment;
    desc.image_sampler_pairs[0].image_slot = 0;
    desc.image_sampler_pairs[0].sampler_slot = 0;

    Some(desc)
}
