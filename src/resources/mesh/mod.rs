//! Polygon mesh for a single piece type

mod parser;

pub use parser::{IndexKind, ParseError, SECTIONS};

use crate::backend::{PolygonVertex, RenderContext};
use glam::{Mat4, Vec3};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a mesh file
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("invalid file name {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Indices of one face corner into the mesh's vertex and normal lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub vertex: u32,
    pub normal: u32,
}

/// A 3 or 4 sided face, corners in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub corners: Vec<FaceCorner>,
}

impl Face {
    pub const MIN_CORNERS: usize = 3;
    pub const MAX_CORNERS: usize = 4;
}

/// A face record as read from the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceRecord {
    Valid(Face),
    /// Declared vertex count was not 3 or 4; contributes no geometry
    Invalid { declared: i64, line: usize },
}

/// Immutable polygon mesh.
///
/// Indices in every valid face are guaranteed in range by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<FaceRecord>,
}

impl Mesh {
    /// Load a mesh from a `.mesh` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source).map_err(|source| MeshError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse mesh text
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parser::parse_mesh(source)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    /// Number of face records, valid or not
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn invalid_face_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|f| matches!(f, FaceRecord::Invalid { .. }))
            .count()
    }

    /// Draw every valid face as one filled polygon
    pub fn draw(&self, ctx: &mut dyn RenderContext, transform: &Mat4) {
        let mut corners = [PolygonVertex::new(Vec3::ZERO, Vec3::ZERO); Face::MAX_CORNERS];

        for record in &self.faces {
            let FaceRecord::Valid(face) = record else {
                continue;
            };
            for (slot, corner) in corners.iter_mut().zip(&face.corners) {
                *slot = PolygonVertex::new(
                    self.vertices[corner.vertex as usize],
                    self.normals[corner.normal as usize],
                );
            }
            ctx.draw_polygon(transform, &corners[..face.corners.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DrawList;

    const SQUARE_WITH_BAD_FACE: &str = "\
vlist 4
0 0 0
1 0 0
1 1 0
0 1 0
nlist 1
0 0 1
flist 3
4 0 0 1 0 2 0 3 0
5 0 0 1 0 2 0 3 0 0 0
3 0 0 2 0 3 0
";

    #[test]
    fn test_draw_emits_one_polygon_per_valid_face() {
        let mesh = Mesh::parse(SQUARE_WITH_BAD_FACE).unwrap();
        let mut list = DrawList::new();
        mesh.draw(&mut list, &Mat4::IDENTITY);

        assert_eq!(mesh.face_count(), 3);
        assert_eq!(list.polygon_count(), 2);
        let sizes: Vec<usize> = list
            .polygons()
            .iter()
            .map(|p| list.vertices(p).len())
            .collect();
        assert_eq!(sizes, vec![4, 3]);
    }

    #[test]
    fn test_draw_keeps_file_order_and_pairs_normals() {
        let mesh = Mesh::parse(SQUARE_WITH_BAD_FACE).unwrap();
        let mut list = DrawList::new();
        let transform = Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));
        mesh.draw(&mut list, &transform);

        let triangle = &list.polygons()[1];
        assert_eq!(triangle.transform, transform);
        let positions: Vec<Vec3> = list.vertices(triangle).iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
        );
        assert!(list.vertices(triangle).iter().all(|v| v.normal == Vec3::Z));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Mesh::load("definitely/not/here.mesh").unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let path = std::env::temp_dir().join(format!("no_nlist_{}.mesh", std::process::id()));
        std::fs::write(&path, "vlist 0\nflist 0\n").unwrap();

        let err = Mesh::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err {
            MeshError::Parse { path: p, source } => {
                assert_eq!(p, path);
                assert!(matches!(source, ParseError::SectionOutOfOrder { expected: "nlist", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
