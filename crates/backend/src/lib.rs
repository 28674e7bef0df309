use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod audio;
pub mod host;
pub mod input;
pub mod keys;

pub use app::{
    run_host, run_host_with_stats, AppError, FrameStatsHandle, FrameStatsSnapshot, LoopConfig,
    Renderer,
};
pub use audio::{songs, AudioError, MusicError, MusicManifest, MusicPlayer, MUSIC_SLOT_COUNT};
pub use host::{EngineHost, Platform};
pub use input::{
    mouse_motion_event, EngineEvent, EngineEventKind, InputPoller, InputSource, KeyEvent,
    KeyQueue, DEFAULT_MOUSE_SENSITIVITY, KEY_QUEUE_CAPACITY,
};
pub use keys::{translate, Binding, EngineKey, HostKey, BINDINGS};

pub const ROOT_ENV_VAR: &str = "DGRL_ROOT";
pub const RESOURCE_DIR_NAME: &str = "res";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub resource_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error(
        "DGRL_ROOT is set but does not contain a res/ directory: {path}\n\
Point it at the directory holding the game resources (res/intro.mp3, ...)."
    )]
    InvalidEnvRoot { path: PathBuf },
}

/// Resolves the directory holding `res/`.
///
/// `DGRL_ROOT` wins when set. Otherwise the working directory is used if it
/// has `res/`, then the closest executable ancestor that does. With no match
/// the working directory is returned and music simply fails to load.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let resource_dir = root.join(RESOURCE_DIR_NAME);
    Ok(AppPaths { root, resource_dir })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if has_resource_dir(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let cwd = env::current_dir().map_err(StartupError::CurrentDir)?;
            let exe_dir = env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf));
            Ok(find_root(&cwd, exe_dir.as_deref()))
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root(cwd: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if has_resource_dir(cwd) {
        return normalize_path(cwd);
    }
    exe_dir
        .into_iter()
        .flat_map(Path::ancestors)
        .find(|candidate| has_resource_dir(candidate))
        .map_or_else(|| normalize_path(cwd), normalize_path)
}

fn has_resource_dir(path: &Path) -> bool {
    path.join(RESOURCE_DIR_NAME).is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
