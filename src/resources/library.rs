//! One mesh per piece type, loaded once and shared by every instance

use super::{Mesh, MeshError};
use crate::scene::PieceType;
use std::path::Path;

/// The six piece meshes, indexed by [`PieceType`]
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    meshes: [Mesh; PieceType::COUNT],
}

impl MeshLibrary {
    /// Load `pawn.mesh`, `rook.mesh`, ... from `dir`.
    ///
    /// Fails on the first mesh that cannot be loaded.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, MeshError> {
        let dir = dir.as_ref();
        let [pawn, rook, knight, bishop, queen, king] = PieceType::ALL.map(|piece| {
            let path = dir.join(piece.file_name());
            Mesh::load(&path).map(|mesh| {
                log::info!(
                    "Loaded {:?} mesh from {}: {} vertices, {} normals, {} faces",
                    piece,
                    path.display(),
                    mesh.vertices().len(),
                    mesh.normals().len(),
                    mesh.face_count()
                );
                mesh
            })
        });

        Ok(Self {
            meshes: [pawn?, rook?, knight?, bishop?, queen?, king?],
        })
    }

    /// Build a library from already parsed meshes, in [`PieceType::ALL`] order
    pub fn from_meshes(meshes: [Mesh; PieceType::COUNT]) -> Self {
        Self { meshes }
    }

    pub fn get(&self, piece: PieceType) -> &Mesh {
        &self.meshes[piece as usize]
    }
}
