//! Piece types and the fixed starting layout

use glam::{Mat4, Vec3};

/// Kind of chess piece. Also the index of its mesh in the mesh library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const COUNT: usize = 6;

    pub const ALL: [PieceType; Self::COUNT] = [
        PieceType::Pawn,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Mesh file name for this piece
    pub fn file_name(self) -> &'static str {
        match self {
            PieceType::Pawn => "pawn.mesh",
            PieceType::Rook => "rook.mesh",
            PieceType::Knight => "knight.mesh",
            PieceType::Bishop => "bishop.mesh",
            PieceType::Queen => "queen.mesh",
            PieceType::King => "king.mesh",
        }
    }
}

/// Number of squares along each board edge
pub const BOARD_SIZE: usize = 8;

/// Colors of the two sides
pub const DARK_PIECE_COLOR: Vec3 = Vec3::new(1.0, 0.3, 0.3);
pub const LIGHT_PIECE_COLOR: Vec3 = Vec3::new(0.7, 0.7, 0.4);

/// Multiplier applied to the color of the selected piece
pub const SELECTION_INTENSITY: f32 = 1.5;

/// One placed occurrence of a piece mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceInstance {
    pub transform: Mat4,
    pub color: Vec3,
    pub piece: PieceType,
}

impl PieceInstance {
    pub fn new(piece: PieceType, transform: Mat4, color: Vec3) -> Self {
        Self {
            transform,
            color,
            piece,
        }
    }

    /// Color to draw with, brightened when selected
    pub fn display_color(&self, selected: bool) -> Vec3 {
        if selected {
            self.color * SELECTION_INTENSITY
        } else {
            self.color
        }
    }
}

/// Half-turn about the board centre, mapping one side's squares onto the other's
pub fn opposite_side_transform() -> Mat4 {
    let half = BOARD_SIZE as f32 / 2.0;
    Mat4::from_translation(Vec3::new(half, 0.0, half))
        * Mat4::from_rotation_y(180f32.to_radians())
        * Mat4::from_translation(Vec3::new(-half, 0.0, -half))
}

fn square(file: f32, rank: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(file + 0.5, 0.0, rank + 0.5))
}

/// The 32 pieces of the starting position.
///
/// Indices 0..16 are the dark side (eight pawns, rooks, knights, bishops,
/// queen, king). Indices 16..32 repeat them for the light side, rotated about
/// the board centre, with the light king and queen transforms exchanged so the
/// queens face each other.
pub fn standard_layout() -> Vec<PieceInstance> {
    let mut pieces = Vec::with_capacity(32);

    for file in 0..BOARD_SIZE {
        pieces.push(PieceInstance::new(
            PieceType::Pawn,
            square(file as f32, 1.0),
            DARK_PIECE_COLOR,
        ));
    }

    let back_rank = [
        (PieceType::Rook, [0.0, 7.0].as_slice()),
        (PieceType::Knight, [1.0, 6.0].as_slice()),
        (PieceType::Bishop, [2.0, 5.0].as_slice()),
        (PieceType::Queen, [3.0].as_slice()),
        (PieceType::King, [4.0].as_slice()),
    ];
    for (piece, files) in back_rank {
        for &file in files {
            pieces.push(PieceInstance::new(piece, square(file, 0.0), DARK_PIECE_COLOR));
        }
    }

    let turn = opposite_side_transform();
    let light: Vec<PieceInstance> = pieces
        .iter()
        .map(|dark| PieceInstance::new(dark.piece, turn * dark.transform, LIGHT_PIECE_COLOR))
        .collect();
    pieces.extend(light);

    let len = pieces.len();
    let (queen, king) = (pieces[len - 2].transform, pieces[len - 1].transform);
    pieces[len - 2].transform = king;
    pieces[len - 1].transform = queen;

    pieces
}
