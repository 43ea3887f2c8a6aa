use checkmate_viewer::backend::{DrawList, Material, PassState};
use checkmate_viewer::resources::{FaceRecord, Mesh, MeshLibrary};
use checkmate_viewer::scene::{BoardCamera, ChessBoard, MouseButton, PieceType};
use checkmate_viewer::ViewerConfig;
use glam::Vec3;
use std::path::PathBuf;

fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn load_board() -> ChessBoard {
    let meshes = MeshLibrary::load_from_dir(assets_dir()).unwrap();
    ChessBoard::new(meshes, &ViewerConfig::default())
}

/// Window position (origin top-left) of a world point
fn window_position(board: &ChessBoard, point: Vec3) -> (f32, f32) {
    let viewport = board.viewport();
    let ndc = board.place_camera().view_projection().project_point3(point);
    (
        (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc.y) * 0.5 * viewport.height as f32,
    )
}

#[test]
fn test_bundled_meshes_are_valid() {
    for piece in PieceType::ALL {
        let mesh = Mesh::load(assets_dir().join(piece.file_name())).unwrap();
        assert!(mesh.face_count() > 0, "{piece:?} has no faces");
        assert_eq!(mesh.invalid_face_count(), 0);
        assert!(mesh.faces().iter().all(|f| matches!(f, FaceRecord::Valid(_))));

        // Pieces stand on the board and fit inside one square
        for v in mesh.vertices() {
            assert!(v.y >= 0.0);
            assert!(v.x.abs() < 0.5 && v.z.abs() < 0.5);
        }
    }
}

#[test]
fn test_first_frame() {
    let board = load_board();
    let mut frame = DrawList::new();
    board.draw_scene(&mut frame);

    let meshes = MeshLibrary::load_from_dir(assets_dir()).unwrap();
    let faces_per_pass: usize = board
        .pieces()
        .iter()
        .map(|p| meshes.get(p.piece).face_count())
        .sum();
    assert_eq!(frame.polygon_count(), 64 + 3 * faces_per_pass);

    let opaque = frame
        .polygons()
        .iter()
        .filter(|p| p.state == PassState::OPAQUE)
        .count();
    assert_eq!(opaque, faces_per_pass);

    assert_eq!(frame.current_material(), Material::MATTE);
    assert_eq!(board.selection(), None);
}

#[test]
fn test_click_selects_piece_then_clears() {
    let mut board = load_board();
    board.camera = BoardCamera::new(0.0, 80.0);

    // Body of the dark king
    let king = board.pieces()[15];
    assert_eq!(king.piece, PieceType::King);
    let target = king.transform.transform_point3(Vec3::new(0.0, 1.0, 0.0));

    let (x, y) = window_position(&board, target);
    assert!(board.mouse_button(MouseButton::Left, true, x, y));
    assert_eq!(board.selection(), Some(15));

    let mut frame = DrawList::new();
    board.draw_scene(&mut frame);
    let highlighted = frame
        .polygons()
        .iter()
        .find(|p| p.name == Some(15))
        .unwrap();
    assert_eq!(highlighted.color, (king.color * 1.5).extend(1.0));

    let (x, y) = window_position(&board, Vec3::new(4.0, 0.0, 4.0));
    assert!(board.mouse_button(MouseButton::Left, true, x, y));
    assert_eq!(board.selection(), None);
}

#[test]
fn test_missing_mesh_dir() {
    let result = MeshLibrary::load_from_dir(assets_dir().join("does-not-exist"));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("pawn.mesh"));
}
