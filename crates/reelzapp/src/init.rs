//! # Context Initialization
//!
//! Every client run starts by locating the data directory (the equivalent of a
//! browser profile), loading configuration from it, and building a
//! [`ReelzApi`] over a [`FileStore`] rooted there.
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit override (the CLI's `--data DIR`).
//! 2. The `REELZ_DATA` environment variable (used by tests to isolate state).
//! 3. The OS-appropriate data directory via the `directories` crate.
//!
//! Nothing is created on disk until the first write.

use crate::api::ReelzApi;
use crate::config::{ReelzConfig, CONFIG_FILE_NAME};
use crate::error::{ReelzError, Result};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DATA_DIR_ENV: &str = "REELZ_DATA";

pub struct ReelzContext {
    pub api: ReelzApi<FileStore>,
    pub config: ReelzConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "reelz", "reelz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ReelzError::Store("Could not determine data directory".to_string()))
}

/// Loads `reelz.toml` from the data directory, layered over the compiled
/// defaults and under `REELZ__*` environment variables.
pub fn load_config(data_dir: &Path) -> ReelzConfig {
    let loaded = Clapfig::builder::<ReelzConfig>()
        .app_name("reelz")
        .file_name(CONFIG_FILE_NAME)
        .search_paths(vec![SearchPath::Path(data_dir.to_path_buf())])
        .load();
    match loaded {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "could not load configuration, using defaults");
            ReelzConfig::default()
        }
    }
}

/// Builds a store and API from an already-resolved configuration.
pub fn build_api(data_dir: &Path, config: &ReelzConfig) -> ReelzApi<FileStore> {
    let store = FileStore::new_fs(data_dir.to_path_buf())
        .with_conflict_policy(config.conflict_policy)
        .with_user_video_mirror(config.mirror_user_videos);
    ReelzApi::new(store).with_media_limits(config.media_limits())
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<ReelzContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = load_config(&data_dir);
    debug!(data_dir = %data_dir.display(), ?config, "initialized context");

    let api = build_api(&data_dir, &config);
    Ok(ReelzContext {
        api,
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConflictPolicy;
    use tempfile::tempdir;

    #[test]
    fn explicit_override_wins() {
        let dir = tempdir().unwrap();
        let resolved = resolve_data_dir(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn config_file_in_data_dir_is_read() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "max_duration_secs = 60\nconflict_policy = \"reject\"\n",
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.max_duration_secs, 60);
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
        assert_eq!(config.max_upload_bytes, 104857600);
    }

    #[test]
    fn initialize_uses_config_limits() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "max_upload_bytes = 5\n").unwrap();

        let ctx = initialize(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(ctx.api.media_limits().max_bytes, 5);
        assert_eq!(ctx.data_dir, dir.path());
    }
}
