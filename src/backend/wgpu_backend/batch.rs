//! CPU side of frame submission: world-space triangles grouped by pass state

use crate::backend::recorder::DrawList;
use crate::backend::types::PassState;
use bytemuck::{Pod, Zeroable};
use glam::Mat3;
use std::ops::Range;

/// Vertex layout consumed by the scene shader
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    /// rgb = material specular
    pub specular: [f32; 4],
    /// x = shininess, y = 1 when the clip plane applies
    pub params: [f32; 4],
}

impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Consecutive triangles drawn with one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub state: PassState,
    pub vertices: Range<u32>,
}

/// Fan-triangulate every recorded polygon into world space.
///
/// Polygons with fewer than three corners are dropped.
pub fn build_batches(frame: &DrawList) -> (Vec<GpuVertex>, Vec<Batch>) {
    let mut vertices = Vec::with_capacity(frame.vertex_count() * 2);
    let mut batches: Vec<Batch> = Vec::new();

    for polygon in frame.polygons() {
        let corners = frame.vertices(polygon);
        if corners.len() < 3 {
            continue;
        }

        let normal_matrix = Mat3::from_mat4(polygon.transform);
        let params = [
            polygon.material.shininess,
            if polygon.state.clip_plane { 1.0 } else { 0.0 },
            0.0,
            0.0,
        ];
        let to_gpu = |index: usize| {
            let corner = &corners[index];
            GpuVertex {
                position: polygon.transform.project_point3(corner.position).to_array(),
                normal: (normal_matrix * corner.normal).normalize_or_zero().to_array(),
                color: polygon.color.to_array(),
                specular: polygon.material.specular.to_array(),
                params,
            }
        };

        let start = vertices.len() as u32;
        for i in 1..corners.len() - 1 {
            vertices.push(to_gpu(0));
            vertices.push(to_gpu(i));
            vertices.push(to_gpu(i + 1));
        }
        let end = vertices.len() as u32;

        match batches.last_mut() {
            Some(batch) if batch.state == polygon.state => batch.vertices.end = end,
            _ => batches.push(Batch {
                state: polygon.state,
                vertices: start..end,
            }),
        }
    }

    (vertices, batches)
}
