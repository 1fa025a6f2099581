use house::{
    resolve_app_paths, AppPaths, HideAndSeekGame, HouseError, StartupError,
    DEFAULT_HOUSE_FILE_NAME,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::random::ThreadRngIndex;

const HOUSE_ENV_VAR: &str = "HIDESEEK_HOUSE";
const OPPONENTS_ENV_VAR: &str = "HIDESEEK_OPPONENTS";
const DEFAULT_OPPONENTS: [&str; 5] = ["Joe", "Bob", "Ana", "Owen", "Jimmy"];

pub(crate) struct AppWiring {
    pub(crate) paths: AppPaths,
    pub(crate) game: HideAndSeekGame,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Game(#[from] HouseError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Hide and Seek Startup ===");

    let paths = resolve_app_paths()?;
    let house_file_name = house_from_env();
    let opponents = parse_opponents(std::env::var(OPPONENTS_ENV_VAR).ok().as_deref());
    info!(
        root = %paths.root.display(),
        house = %house_file_name,
        opponent_count = opponents.len(),
        "startup_config"
    );

    let game = HideAndSeekGame::new(
        Box::new(paths.file_store()),
        Box::new(ThreadRngIndex),
        &house_file_name,
        opponents,
    )?;

    Ok(AppWiring { paths, game })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn house_from_env() -> String {
    std::env::var(HOUSE_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_HOUSE_FILE_NAME.to_string())
}

fn parse_opponents(raw: Option<&str>) -> Vec<String> {
    let parsed = raw
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if parsed.is_empty() {
        DEFAULT_OPPONENTS.iter().map(ToString::to_string).collect()
    } else {
        parsed
    }
}
