use bytemuck::{Pod, Zeroable};
use gl::types::*;
use log::debug;
use std::mem::{offset_of, size_of};

/// Interleaved vertex: position followed by color, both as float triplets.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// One `glVertexAttribPointer` call worth of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: GLuint,
    pub components: GLint,
    pub stride_bytes: GLsizei,
    pub offset_bytes: usize,
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Position at location 0, color at location 1.
    pub fn attributes() -> [VertexAttribute; 2] {
        let stride_bytes = size_of::<Vertex>() as GLsizei;
        [
            VertexAttribute {
                index: 0,
                components: 3,
                stride_bytes,
                offset_bytes: offset_of!(Vertex, position),
            },
            VertexAttribute {
                index: 1,
                components: 3,
                stride_bytes,
                offset_bytes: offset_of!(Vertex, color),
            },
        ]
    }
}

pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    // positions            // colors
    Vertex::new([0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),  // bottom right
    Vertex::new([-0.5, -0.5, 0.0], [0.0, 1.0, 0.0]), // bottom left
    Vertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0]),   // top
];

/// Vertex array + vertex buffer pair holding static geometry.
pub struct TriangleMesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl TriangleMesh {
    pub fn new(vertices: &[Vertex]) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            for attribute in Vertex::attributes() {
                gl::VertexAttribPointer(
                    attribute.index,
                    attribute.components,
                    gl::FLOAT,
                    gl::FALSE,
                    attribute.stride_bytes,
                    attribute.offset_bytes as *const _,
                );
                gl::EnableVertexAttribArray(attribute.index);
            }

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        debug!(
            "Uploaded {} vertices ({} bytes) to vao {} / vbo {}",
            vertices.len(),
            bytes.len(),
            vao,
            vbo
        );

        Self {
            vao,
            vbo,
            vertex_count: vertices.len() as GLsizei,
        }
    }

    pub fn vertex_count(&self) -> GLsizei {
        self.vertex_count
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
        }
    }
}

impl Drop for TriangleMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}

/// Color the rasterizer would produce at `point` (clip-space x/y) when
/// interpolating vertex colors across the triangle. `None` outside it.
pub fn barycentric_color(vertices: &[Vertex; 3], point: [f32; 2]) -> Option<[f32; 3]> {
    let [a, b, c] = vertices.map(|v| [v.position[0], v.position[1]]);

    let area = edge(a, b, c);
    if area.abs() < f32::EPSILON {
        return None;
    }

    let w0 = edge(b, c, point) / area;
    let w1 = edge(c, a, point) / area;
    let w2 = edge(a, b, point) / area;

    // Tolerance keeps points exactly on an edge inside
    const EPS: f32 = 1e-6;
    if w0 < -EPS || w1 < -EPS || w2 < -EPS {
        return None;
    }

    let mut color = [0.0; 3];
    for (channel, out) in color.iter_mut().enumerate() {
        *out = w0 * vertices[0].color[channel]
            + w1 * vertices[1].color[channel]
            + w2 * vertices[2].color[channel];
    }
    Some(color)
}

fn edge(from: [f32; 2], to: [f32; 2], point: [f32; 2]) -> f32 {
    (to[0] - from[0]) * (point[1] - from[1]) - (to[1] - from[1]) * (point[0] - from[0])
}
