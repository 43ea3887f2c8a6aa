use checkmate_viewer::resources::{MeshError, MeshLibrary};
use checkmate_viewer::{window, ViewerConfig};
use clap::Parser;
use std::path::PathBuf;

/// Interactive 3D chess board.
///
/// Hold 'a' and move the mouse to orbit the board; click a piece to select it.
#[derive(Parser, Debug)]
#[command(name = "checkmate-viewer", version)]
struct Args {
    /// Directory containing pawn.mesh, rook.mesh, knight.mesh, bishop.mesh,
    /// queen.mesh and king.mesh.
    #[arg(long, default_value = "assets")]
    mesh_dir: PathBuf,

    /// Initial window width in pixels.
    #[arg(long, default_value = "800")]
    width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value = "600")]
    height: u32,

    /// Disable vertical sync (may cause tearing).
    #[arg(long)]
    no_vsync: bool,
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        Self {
            width: args.width,
            height: args.height,
            vsync: !args.no_vsync,
            mesh_dir: args.mesh_dir,
            ..Default::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from(Args::parse());

    let meshes = match MeshLibrary::load_from_dir(&config.mesh_dir) {
        Ok(meshes) => meshes,
        Err(err @ MeshError::Io { .. }) => {
            log::error!("Unable to load piece meshes: {err}");
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("Mesh invalid: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = window::run(config, meshes) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
