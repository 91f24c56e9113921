//! Demo renderer: draws the open spread and the live fold state from a
//! single uniform block. Page faces are flat tints keyed by index; real
//! sprite lookup is the host's business.

use crate::config::StyleConfig;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PageUniforms {
    /// (leaf width, half spread height) in book-local units.
    pub book_half: [f32; 2],
    pub aspect_ratio: f32,
    /// 1.0 while a turn is live, else 0.0.
    pub turning: f32,
    pub fold_corner: [f32; 2],
    pub cross_point: [f32; 2],
    pub book_corner: [f32; 2],
    /// +1.0 for a right turn, -1.0 for a left turn.
    pub direction: f32,
    pub shadow_strength: f32,
    pub cover_color: [f32; 3],
    pub _pad0: f32,
    pub left_tint: [f32; 3],
    pub _pad1: f32,
    pub right_tint: [f32; 3],
    pub _pad2: f32,
    pub front_tint: [f32; 3],
    pub _pad3: f32,
    pub back_tint: [f32; 3],
    pub _pad4: f32,
}

impl Default for PageUniforms {
    fn default() -> Self {
        let style = StyleConfig::default();
        Self {
            book_half: [300.0, 200.0],
            aspect_ratio: 16.0 / 9.0,
            turning: 0.0,
            fold_corner: [0.0, 0.0],
            cross_point: [0.0, 0.0],
            book_corner: [0.0, 0.0],
            direction: 1.0,
            shadow_strength: style.shadow_strength,
            cover_color: style.cover_color,
            _pad0: 0.0,
            left_tint: style.paper_color,
            _pad1: 0.0,
            right_tint: style.paper_color,
            _pad2: 0.0,
            front_tint: style.paper_color,
            _pad3: 0.0,
            back_tint: style.paper_color,
            _pad4: 0.0,
        }
    }
}

/// Flat tint standing in for the image of page `index`. Blank faces
/// (the `-1` cover and anything past the last page) render as bare
/// paper; numbered pages shade progressively toward the ink color so
/// turns are visible without any image assets.
pub fn page_tint(index: i32, page_count: u32, style: &StyleConfig) -> [f32; 3] {
    if index < 0 || index >= page_count as i32 {
        return style.paper_color;
    }
    let t = if page_count > 1 {
        0.15 + 0.7 * index as f32 / (page_count - 1) as f32
    } else {
        0.5
    };
    [
        style.paper_color[0] + (style.ink_color[0] - style.paper_color[0]) * t,
        style.paper_color[1] + (style.ink_color[1] - style.paper_color[1]) * t,
        style.paper_color[2] + (style.ink_color[2] - style.paper_color[2]) * t,
    ]
}

pub struct PageRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PageRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("page_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/page.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("page_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("page_uniform_buffer"),
            size: std::mem::size_of::<PageUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("page_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("page_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("page_render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn upload(&self, queue: &wgpu::Queue, uniforms: &PageUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_faces_render_as_bare_paper() {
        let style = StyleConfig::default();
        assert_eq!(page_tint(-1, 8, &style), style.paper_color);
        assert_eq!(page_tint(8, 8, &style), style.paper_color);
    }

    #[test]
    fn page_tints_darken_with_index() {
        let style = StyleConfig::default();
        let early = page_tint(0, 8, &style);
        let late = page_tint(7, 8, &style);
        assert!(late[0] < early[0]);
    }
}
