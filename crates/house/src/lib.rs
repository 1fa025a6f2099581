use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod content;
pub mod error;
pub mod random;
pub mod session;
pub mod world;

pub use content::{
    house_file_path, load_house, parse_house_json, save_file_path, save_house, serialize_house,
    validate_file_name, FileStore, FsFileStore, MemoryFileStore, HOUSE_FILE_SUFFIX,
    SAVE_FILE_SUFFIX,
};
pub use error::{ErrorKind, HouseError, HouseResult, SourceLocation};
pub use random::{FixedIndex, IndexSource, SequenceIndex};
pub use session::{
    parse_command, parse_saved_game_json, restore_game_state, serialize_saved_game, CheckOutcome,
    Command, GameState, HideAndSeekGame, SavedGame,
};
pub use world::{
    default_house, Direction, HouseGraph, Location, LocationId, LocationKind, UnknownDirection,
    DEFAULT_HOUSE_FILE_NAME,
};

pub const ROOT_ENV_VAR: &str = "HIDESEEK_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub houses_dir: PathBuf,
    pub saves_dir: PathBuf,
}

impl AppPaths {
    /// A file store reading houses from `houses_dir` and keeping saves in `saves_dir`.
    pub fn file_store(&self) -> FsFileStore {
        FsFileStore::new(&self.houses_dir).with_save_dir(&self.saves_dir)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("failed to create saves directory at {path}: {source}")]
    CreateSavesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HIDESEEK_ROOT must name a directory holding Cargo.toml and assets/, got {0}")]
    InvalidEnvRoot(PathBuf),
    #[error("no directory holding Cargo.toml and assets/ above {0}; set HIDESEEK_ROOT")]
    RootNotFound(PathBuf),
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    app_paths_under(root)
}

fn app_paths_under(root: PathBuf) -> Result<AppPaths, StartupError> {
    let houses_dir = root.join("assets").join("houses");
    let saves_dir = root.join("saves");

    fs::create_dir_all(&saves_dir).map_err(|source| StartupError::CreateSavesDir {
        path: saves_dir.clone(),
        source,
    })?;

    Ok(AppPaths {
        root,
        houses_dir,
        saves_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    if let Some(value) = env::var_os(ROOT_ENV_VAR).filter(|value| !value.is_empty()) {
        let root = normalize_path(Path::new(&value));
        return if is_repo_marker(&root) {
            Ok(root)
        } else {
            Err(StartupError::InvalidEnvRoot(root))
        };
    }

    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    let start = exe.parent().unwrap_or(&exe);
    start
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
        .ok_or_else(|| StartupError::RootNotFound(normalize_path(start)))
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("assets").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
