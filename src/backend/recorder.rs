//! Frame recording
//!
//! [`DrawList`] captures every polygon of a frame together with the state it
//! was issued under. The wgpu backend turns it into vertex batches; tests
//! inspect it directly.

use crate::backend::traits::RenderContext;
use crate::backend::types::*;
use glam::{Mat4, Vec4};
use std::ops::Range;

/// A polygon as it was drawn, with the sticky state at that moment
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub state: PassState,
    pub material: Material,
    pub color: Vec4,
    /// Top of the name stack, if any
    pub name: Option<u32>,
    pub transform: Mat4,
    vertices: Range<usize>,
}

/// Recorded frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    polygons: Vec<PolygonRecord>,
    vertices: Vec<PolygonVertex>,
    state: PassState,
    material: Material,
    color: Vec4,
    names: Vec<u32>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            color: Vec4::ONE,
            ..Default::default()
        }
    }

    /// Drop recorded polygons and reset sticky state
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn polygons(&self) -> &[PolygonRecord] {
        &self.polygons
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Corners of a recorded polygon
    pub fn vertices(&self, polygon: &PolygonRecord) -> &[PolygonVertex] {
        &self.vertices[polygon.vertices.clone()]
    }

    /// Total number of polygon corners in the frame
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Material in effect after the last recorded call
    pub fn current_material(&self) -> Material {
        self.material
    }

    /// Depth of the name stack after the last recorded call
    pub fn name_depth(&self) -> usize {
        self.names.len()
    }
}

impl RenderContext for DrawList {
    fn set_pass_state(&mut self, state: PassState) {
        self.state = state;
    }

    fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    fn push_name(&mut self, name: u32) {
        self.names.push(name);
    }

    fn pop_name(&mut self) {
        self.names.pop();
    }

    fn draw_polygon(&mut self, transform: &Mat4, vertices: &[PolygonVertex]) {
        let start = self.vertices.len();
        self.vertices.extend_from_slice(vertices);
        self.polygons.push(PolygonRecord {
            state: self.state,
            material: self.material,
            color: self.color,
            name: self.names.last().copied(),
            transform: *transform,
            vertices: start..self.vertices.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle() -> [PolygonVertex; 3] {
        [
            PolygonVertex::new(Vec3::ZERO, Vec3::Y),
            PolygonVertex::new(Vec3::X, Vec3::Y),
            PolygonVertex::new(Vec3::Z, Vec3::Y),
        ]
    }

    #[test]
    fn test_records_sticky_state() {
        let mut list = DrawList::new();
        list.set_pass_state(PassState::SHADOW);
        list.set_color(Vec4::new(0.0, 0.0, 0.0, 0.5));
        list.draw_polygon(&Mat4::IDENTITY, &triangle());

        list.set_pass_state(PassState::OPAQUE);
        list.set_material(Material::GLOSSY);
        list.push_name(7);
        list.draw_polygon(&Mat4::from_translation(Vec3::X), &triangle());
        list.pop_name();

        assert_eq!(list.polygon_count(), 2);
        let first = &list.polygons()[0];
        assert_eq!(first.state, PassState::SHADOW);
        assert_eq!(first.name, None);
        assert_eq!(first.color.w, 0.5);

        let second = &list.polygons()[1];
        assert_eq!(second.state, PassState::OPAQUE);
        assert_eq!(second.material, Material::GLOSSY);
        assert_eq!(second.name, Some(7));
        assert_eq!(list.vertices(second).len(), 3);
        assert_eq!(list.name_depth(), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut list = DrawList::new();
        list.set_material(Material::GLOSSY);
        list.draw_polygon(&Mat4::IDENTITY, &triangle());
        list.clear();

        assert_eq!(list.polygon_count(), 0);
        assert_eq!(list.vertex_count(), 0);
        assert_eq!(list.current_material(), Material::MATTE);
    }
}
