//! Board controller: scene drawing, picking and input handling

use crate::backend::{
    nearest_hit, pick_matrix, CameraMatrices, Material, PassState, PolygonVertex, RenderContext,
    SelectionBuffer, Viewport,
};
use crate::resources::MeshLibrary;
use crate::ViewerConfig;
use glam::{Mat4, Vec2, Vec3, Vec4};

use super::{
    reflection_transform, shadow_transform, standard_layout, BoardCamera, InputState,
    PieceInstance, BOARD_CLIP_PLANE, BOARD_SIZE, REFLECTION_ALPHA, SHADOW_ALPHA,
};

/// Square colors by parity of (x + z)
pub const EVEN_SQUARE_COLOR: Vec3 = Vec3::new(0.8, 0.6, 0.3);
pub const ODD_SQUARE_COLOR: Vec3 = Vec3::new(0.9, 0.4, 0.3);

/// Mouse buttons the controller distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Chess board scene with its camera, input state and current selection.
///
/// Input callbacks return `true` when the window should be redrawn.
pub struct ChessBoard {
    meshes: MeshLibrary,
    pieces: Vec<PieceInstance>,
    pub camera: BoardCamera,
    input: InputState,
    selection: Option<usize>,
    viewport: Viewport,
    pick_size: f32,
    selection_capacity: usize,
}

impl ChessBoard {
    pub fn new(meshes: MeshLibrary, config: &ViewerConfig) -> Self {
        Self {
            meshes,
            pieces: standard_layout(),
            camera: BoardCamera::default(),
            input: InputState::new(config.rotate_key),
            selection: None,
            viewport: Viewport::new(config.width, config.height),
            pick_size: config.pick_size as f32,
            selection_capacity: config.selection_capacity,
        }
    }

    pub fn pieces(&self) -> &[PieceInstance] {
        &self.pieces
    }

    /// Index of the selected piece instance
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track the window size used for aspect ratio and picking
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Camera matrices for the current viewport
    pub fn place_camera(&self) -> CameraMatrices {
        self.camera.place(self.viewport.aspect_ratio())
    }

    /// Draw the full scene: board, reflections, shadows, then pieces
    pub fn draw_scene(&self, ctx: &mut dyn RenderContext) {
        ctx.set_pass_state(PassState::BOARD);
        self.draw_board(ctx);

        ctx.set_pass_state(PassState::REFLECTION);
        for (index, piece) in self.pieces.iter().enumerate() {
            let color = piece.display_color(self.is_selected(index));
            ctx.set_color(color.extend(REFLECTION_ALPHA));
            self.meshes
                .get(piece.piece)
                .draw(ctx, &reflection_transform(&piece.transform));
        }

        ctx.set_pass_state(PassState::SHADOW);
        ctx.set_color(Vec4::new(0.0, 0.0, 0.0, SHADOW_ALPHA));
        for piece in &self.pieces {
            self.meshes
                .get(piece.piece)
                .draw(ctx, &shadow_transform(&piece.transform));
        }

        ctx.set_pass_state(PassState::OPAQUE);
        ctx.set_material(Material::GLOSSY);
        for (index, piece) in self.pieces.iter().enumerate() {
            ctx.push_name(index as u32);
            ctx.set_color(piece.display_color(self.is_selected(index)).extend(1.0));
            self.meshes.get(piece.piece).draw(ctx, &piece.transform);
            ctx.pop_name();
        }

        ctx.set_material(Material::MATTE);
    }

    fn draw_board(&self, ctx: &mut dyn RenderContext) {
        for x in 0..BOARD_SIZE {
            for z in 0..BOARD_SIZE {
                let color = if (x + z) % 2 == 0 {
                    EVEN_SQUARE_COLOR
                } else {
                    ODD_SQUARE_COLOR
                };
                ctx.set_color(color.extend(1.0));

                let (x, z) = (x as f32, z as f32);
                let square = [
                    PolygonVertex::new(Vec3::new(x, 0.0, z), Vec3::Y),
                    PolygonVertex::new(Vec3::new(x, 0.0, z + 1.0), Vec3::Y),
                    PolygonVertex::new(Vec3::new(x + 1.0, 0.0, z + 1.0), Vec3::Y),
                    PolygonVertex::new(Vec3::new(x + 1.0, 0.0, z), Vec3::Y),
                ];
                ctx.draw_polygon(&Mat4::IDENTITY, &square);
            }
        }
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selection == Some(index)
    }

    /// Names of the nearest geometry under window position `(x, y)`
    /// (origin top-left). Empty when nothing named was hit.
    pub fn select_geometry(&self, x: f32, y: f32) -> Vec<u32> {
        let camera = self.place_camera();
        let pick = pick_matrix(
            x,
            self.viewport.height as f32 - y,
            self.pick_size,
            self.pick_size,
            &self.viewport,
        );
        let camera = CameraMatrices {
            projection: pick * camera.projection,
            view: camera.view,
        };

        let mut buffer = SelectionBuffer::new(&camera, BOARD_CLIP_PLANE, self.selection_capacity);
        self.draw_scene(&mut buffer);

        match buffer.finish() {
            Ok(records) => {
                log::trace!("Picking at ({x}, {y}) produced {} hit records", records.len());
                nearest_hit(&records)
            }
            Err(err) => {
                log::warn!("Picking at ({x}, {y}) failed: {err}");
                Vec::new()
            }
        }
    }

    pub fn key_down(&mut self, key: char, x: f32, y: f32) -> bool {
        self.input.key_down(key, Vec2::new(x, y));
        false
    }

    pub fn key_up(&mut self, key: char, x: f32, y: f32) -> bool {
        self.input.key_up(key, Vec2::new(x, y));
        false
    }

    /// Primary button press selects the piece under the cursor, or clears
    /// the selection when there is none
    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool, x: f32, y: f32) -> bool {
        if button != MouseButton::Left || !pressed {
            return false;
        }

        let names = self.select_geometry(x, y);
        self.selection = names
            .last()
            .map(|&name| name as usize)
            .filter(|&index| index < self.pieces.len());

        match self.selection {
            Some(index) => log::info!("Selected {:?} #{index}", self.pieces[index].piece),
            None => log::debug!("Selection cleared"),
        }
        true
    }

    /// Cursor moved with a button held
    pub fn motion(&mut self, _x: f32, _y: f32) -> bool {
        false
    }

    /// Cursor moved with no button held
    pub fn passive_motion(&mut self, x: f32, y: f32) -> bool {
        let orbited = self.input.passive_motion(Vec2::new(x, y), &mut self.camera);
        if orbited {
            log::debug!(
                "Camera rotation {:.1}, elevation {:.1}",
                self.camera.rotation,
                self.camera.elevation
            );
        }
        orbited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DrawList, StencilMode};
    use crate::resources::Mesh;

    const CUBE: &str = "\
vlist 8
-0.3 0 -0.3
0.3 0 -0.3
0.3 0 0.3
-0.3 0 0.3
-0.3 0.6 -0.3
0.3 0.6 -0.3
0.3 0.6 0.3
-0.3 0.6 0.3
nlist 6
0 -1 0
0 1 0
1 0 0
-1 0 0
0 0 1
0 0 -1
flist 6
4 0 0 1 0 2 0 3 0
4 4 1 7 1 6 1 5 1
4 1 2 5 2 6 2 2 2
4 0 3 3 3 7 3 4 3
4 3 4 2 4 6 4 7 4
4 0 5 4 5 5 5 1 5
";

    fn board() -> ChessBoard {
        board_with(&ViewerConfig::default())
    }

    fn board_with(config: &ViewerConfig) -> ChessBoard {
        let cube = Mesh::parse(CUBE).unwrap();
        let meshes = MeshLibrary::from_meshes(std::array::from_fn(|_| cube.clone()));
        let mut board = ChessBoard::new(meshes, config);
        board.camera = BoardCamera::new(0.0, 80.0);
        board
    }

    /// Window position (origin top-left) of a world point
    fn window_position(board: &ChessBoard, point: Vec3) -> (f32, f32) {
        let viewport = board.viewport();
        let ndc = board.place_camera().view_projection().project_point3(point);
        let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;
        (x, y)
    }

    fn piece_top(board: &ChessBoard, index: usize) -> Vec3 {
        board.pieces()[index]
            .transform
            .transform_point3(Vec3::new(0.0, 0.6, 0.0))
    }

    #[test]
    fn test_pass_order() {
        let board = board();
        let mut list = DrawList::new();
        board.draw_scene(&mut list);

        let mut passes: Vec<PassState> = Vec::new();
        for polygon in list.polygons() {
            if passes.last() != Some(&polygon.state) {
                passes.push(polygon.state);
            }
        }
        assert_eq!(
            passes,
            vec![
                PassState::BOARD,
                PassState::REFLECTION,
                PassState::SHADOW,
                PassState::OPAQUE
            ]
        );

        // 64 squares, then 32 pieces of 6 faces in each of three passes
        assert_eq!(list.polygon_count(), 64 + 3 * 32 * 6);
        assert_eq!(list.current_material(), Material::MATTE);
        assert_eq!(list.name_depth(), 0);
    }

    #[test]
    fn test_board_squares_alternate() {
        let board = board();
        let mut list = DrawList::new();
        board.draw_scene(&mut list);

        let squares = &list.polygons()[..64];
        assert!(squares.iter().all(|p| p.state.stencil == StencilMode::Write));
        assert_eq!(squares[0].color, EVEN_SQUARE_COLOR.extend(1.0));
        assert_eq!(squares[1].color, ODD_SQUARE_COLOR.extend(1.0));
        assert_eq!(squares[8].color, ODD_SQUARE_COLOR.extend(1.0));
        assert!(list.vertices(&squares[0]).iter().all(|v| v.normal == Vec3::Y));
    }

    #[test]
    fn test_only_pieces_are_named() {
        let board = board();
        let mut list = DrawList::new();
        board.draw_scene(&mut list);

        for polygon in list.polygons() {
            let named = polygon.name.is_some();
            assert_eq!(named, polygon.state == PassState::OPAQUE);
        }
        let last = list.polygons().last().unwrap();
        assert_eq!(last.name, Some(31));
        assert_eq!(last.material, Material::GLOSSY);
    }

    #[test]
    fn test_shadows_are_translucent_black() {
        let board = board();
        let mut list = DrawList::new();
        board.draw_scene(&mut list);

        let shadow = list
            .polygons()
            .iter()
            .find(|p| p.state == PassState::SHADOW)
            .unwrap();
        assert_eq!(shadow.color, Vec4::new(0.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_selected_piece_is_brightened() {
        let mut board = board();
        board.selection = Some(3);
        let mut list = DrawList::new();
        board.draw_scene(&mut list);

        let base = board.pieces()[3].color;
        let opaque: Vec<_> = list
            .polygons()
            .iter()
            .filter(|p| p.name == Some(3))
            .collect();
        assert!(opaque.iter().all(|p| p.color == (base * 1.5).extend(1.0)));

        let reflections: Vec<_> = list
            .polygons()
            .iter()
            .filter(|p| p.state == PassState::REFLECTION)
            .collect();
        // Reflections keep per-piece order, six faces each
        assert_eq!(reflections[3 * 6].color, (base * 1.5).extend(0.5));
        assert_eq!(reflections[2 * 6].color, board.pieces()[2].color.extend(0.5));
    }

    #[test]
    fn test_pick_piece() {
        let board = board();
        let (x, y) = window_position(&board, piece_top(&board, 15));
        assert_eq!(board.select_geometry(x, y), vec![15]);
    }

    #[test]
    fn test_pick_follows_window_size() {
        let mut board = board();
        board.resize(1280, 720);
        assert_eq!(board.viewport(), Viewport::new(1280, 720));

        let (x, y) = window_position(&board, piece_top(&board, 15));
        assert_eq!(board.select_geometry(x, y), vec![15]);
    }

    #[test]
    fn test_pick_empty_square() {
        let board = board();
        let (x, y) = window_position(&board, Vec3::new(4.0, 0.0, 4.0));
        assert!(board.select_geometry(x, y).is_empty());
    }

    #[test]
    fn test_pick_outside_board() {
        let board = board();
        assert!(board.select_geometry(2.0, 2.0).is_empty());
    }

    #[test]
    fn test_mouse_press_selects_and_clears() {
        let mut board = board();
        let (x, y) = window_position(&board, piece_top(&board, 20));

        // Release and other buttons do nothing
        assert!(!board.mouse_button(MouseButton::Left, false, x, y));
        assert!(!board.mouse_button(MouseButton::Right, true, x, y));
        assert_eq!(board.selection(), None);

        assert!(board.mouse_button(MouseButton::Left, true, x, y));
        assert_eq!(board.selection(), Some(20));

        let (x, y) = window_position(&board, Vec3::new(4.0, 0.0, 4.0));
        assert!(board.mouse_button(MouseButton::Left, true, x, y));
        assert_eq!(board.selection(), None);
    }

    #[test]
    fn test_overflow_means_no_selection() {
        let config = ViewerConfig {
            selection_capacity: 2,
            ..Default::default()
        };
        let mut board = board_with(&config);
        let (x, y) = window_position(&board, piece_top(&board, 15));

        assert!(board.select_geometry(x, y).is_empty());
        assert!(board.mouse_button(MouseButton::Left, true, x, y));
        assert_eq!(board.selection(), None);
    }

    #[test]
    fn test_rotate_key_orbits_camera() {
        let mut board = board();
        let start = board.camera;

        assert!(!board.passive_motion(10.0, 10.0));
        assert_eq!(board.camera, start);

        assert!(!board.key_down('a', 10.0, 10.0));
        assert!(board.passive_motion(30.0, 0.0));
        assert_eq!(board.camera.rotation, start.rotation + 10.0);
        assert_eq!(board.camera.elevation, start.elevation - 5.0);

        board.key_up('a', 30.0, 0.0);
        assert!(!board.passive_motion(60.0, 0.0));
        assert_eq!(board.input().mouse, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn test_drag_is_ignored() {
        let mut board = board();
        board.key_down('a', 0.0, 0.0);
        let start = board.camera;
        assert!(!board.motion(50.0, 50.0));
        assert_eq!(board.camera, start);
    }
}
