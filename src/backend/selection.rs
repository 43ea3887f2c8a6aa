//! Software selection buffer
//!
//! Emulates the fixed-function selection render mode: the scene is drawn
//! through a narrow pick volume, every primitive that survives clipping marks
//! a hit, and a hit record `[name_count, z_min, z_max, names...]` is written
//! whenever the name stack changes or selection finishes.

use crate::backend::traits::RenderContext;
use crate::backend::types::*;
use glam::{Mat4, Vec3, Vec4};
use thiserror::Error;

/// Default selection buffer size in 32-bit words
pub const DEFAULT_SELECTION_CAPACITY: usize = 2048;

/// Words in a hit record header (name count, z min, z max)
const RECORD_HEADER: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection buffer overflow ({capacity} words)")]
    BufferOverflow { capacity: usize },
}

/// One hit record read back from the selection buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    pub z_min: u32,
    pub z_max: u32,
    pub names: Vec<u32>,
}

/// Build a pick matrix restricting drawing to a `width` x `height` pixel
/// region centred on window coordinates `(x, y)` (origin bottom-left).
///
/// Multiply it in front of the projection matrix.
pub fn pick_matrix(x: f32, y: f32, width: f32, height: f32, viewport: &Viewport) -> Mat4 {
    let vw = viewport.width as f32;
    let vh = viewport.height as f32;
    let offset = Vec3::new(
        (vw - 2.0 * (x - viewport.x as f32)) / width,
        (vh - 2.0 * (y - viewport.y as f32)) / height,
        0.0,
    );
    Mat4::from_translation(offset) * Mat4::from_scale(Vec3::new(vw / width, vh / height, 1.0))
}

/// Nearest hit (smallest z_min, ties broken by the name list).
///
/// Returns the name stack of that record, or an empty list if nothing was hit.
pub fn nearest_hit(records: &[HitRecord]) -> Vec<u32> {
    records
        .iter()
        .min_by(|a, b| a.z_min.cmp(&b.z_min).then_with(|| a.names.cmp(&b.names)))
        .map(|record| record.names.clone())
        .unwrap_or_default()
}

/// Selection mode render context
pub struct SelectionBuffer {
    view_projection: Mat4,
    clip_plane: Vec4,
    state: PassState,
    names: Vec<u32>,
    pending: Option<(f32, f32)>,
    words: Vec<u32>,
    capacity: usize,
    overflowed: bool,
}

impl SelectionBuffer {
    /// `camera.projection` is expected to already include the pick matrix.
    /// `clip_plane` is a world-space plane; points with a negative distance
    /// are clipped whenever the pass state enables the clip plane.
    pub fn new(camera: &CameraMatrices, clip_plane: Vec4, capacity: usize) -> Self {
        Self {
            view_projection: camera.view_projection(),
            clip_plane,
            state: PassState::default(),
            names: Vec::new(),
            pending: None,
            words: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// Flush the last pending hit and read back all hit records
    pub fn finish(mut self) -> Result<Vec<HitRecord>, SelectionError> {
        self.flush_hit();
        if self.overflowed {
            return Err(SelectionError::BufferOverflow {
                capacity: self.capacity,
            });
        }

        let mut records = Vec::new();
        let mut pos = 0;
        while pos < self.words.len() {
            let count = self.words[pos] as usize;
            let names = self.words[pos + RECORD_HEADER..pos + RECORD_HEADER + count].to_vec();
            records.push(HitRecord {
                z_min: self.words[pos + 1],
                z_max: self.words[pos + 2],
                names,
            });
            pos += RECORD_HEADER + count;
        }
        Ok(records)
    }

    fn flush_hit(&mut self) {
        let Some((z_min, z_max)) = self.pending.take() else {
            return;
        };

        if self.words.len() + RECORD_HEADER + self.names.len() > self.capacity {
            self.overflowed = true;
            return;
        }
        self.words.push(self.names.len() as u32);
        self.words.push(depth_to_u32(z_min));
        self.words.push(depth_to_u32(z_max));
        self.words.extend_from_slice(&self.names);
    }

    fn record_hit(&mut self, z_min: f32, z_max: f32) {
        self.pending = Some(match self.pending {
            Some((lo, hi)) => (lo.min(z_min), hi.max(z_max)),
            None => (z_min, z_max),
        });
    }
}

impl RenderContext for SelectionBuffer {
    fn set_pass_state(&mut self, state: PassState) {
        self.state = state;
    }

    fn set_material(&mut self, _material: Material) {}

    fn set_color(&mut self, _color: Vec4) {}

    fn push_name(&mut self, name: u32) {
        self.flush_hit();
        self.names.push(name);
    }

    fn pop_name(&mut self) {
        self.flush_hit();
        self.names.pop();
    }

    fn draw_polygon(&mut self, transform: &Mat4, vertices: &[PolygonVertex]) {
        let mut polygon: Vec<Vec4> = vertices
            .iter()
            .map(|v| *transform * v.position.extend(1.0))
            .collect();

        if self.state.clip_plane {
            let plane = self.clip_plane;
            polygon = clip_polygon(&polygon, |p| plane.dot(p));
        }

        let mut polygon: Vec<Vec4> = polygon.iter().map(|p| self.view_projection * *p).collect();
        for axis in 0..3 {
            polygon = clip_polygon(&polygon, |p| p.w + p[axis]);
            polygon = clip_polygon(&polygon, |p| p.w - p[axis]);
        }
        if polygon.is_empty() {
            return;
        }

        let (z_min, z_max) = polygon
            .iter()
            .map(|p| (p.z / p.w) * 0.5 + 0.5)
            .fold((f32::MAX, f32::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));
        self.record_hit(z_min, z_max);
    }
}

/// Sutherland-Hodgman clip of a homogeneous polygon against one half-space
fn clip_polygon(polygon: &[Vec4], distance: impl Fn(Vec4) -> f32) -> Vec<Vec4> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let d_current = distance(current);
        let d_next = distance(next);

        if d_current >= 0.0 {
            out.push(current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            out.push(current + (next - current) * t);
        }
    }
    out
}

fn depth_to_u32(z: f32) -> u32 {
    (f64::from(z.clamp(0.0, 1.0)) * f64::from(u32::MAX)).round() as u32
}
