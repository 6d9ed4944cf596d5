//! # Configuration
//!
//! Reelz configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `REELZ__MAX_UPLOAD_BYTES`, `REELZ__CONFLICT_POLICY`, etc.
//! 2. **Data Dir Config**: `reelz.toml` inside the data directory.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `max_upload_bytes` | `104857600` | Largest accepted video file (100 MiB) |
//! | `max_duration_secs` | `300` | Longest accepted video |
//! | `conflict_policy` | `overwrite` | `overwrite` or `reject` a write to a key changed since it was read |
//! | `mirror_user_videos` | `true` | Also write new uploads to `userVideos_<id>` |
//! | `upload_step_ms` | `0` | Delay between simulated upload progress steps |
//!
//! ## CLI Usage
//!
//! - `reelz config`: Show all configuration values.
//! - `reelz config get <key>`: Get a specific value.
//! - `reelz config set <key> <value>`: Set a value.
//! - `reelz config gen`: Generate a sample `reelz.toml`.

use crate::media::{MediaLimits, DEFAULT_MAX_DURATION_SECS, DEFAULT_MAX_UPLOAD_BYTES};
use crate::store::ConflictPolicy;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "reelz.toml";

/// Configuration for reelz, stored in `reelz.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReelzConfig {
    /// Largest accepted video file, in bytes.
    #[config(default = 104857600)]
    pub max_upload_bytes: u64,

    /// Longest accepted video, in seconds.
    #[config(default = 300)]
    pub max_duration_secs: u32,

    /// What to do when a collection changed between our read and our write:
    /// "overwrite" (last write wins) or "reject".
    #[config(default = "overwrite")]
    pub conflict_policy: ConflictPolicy,

    /// Also prepend new uploads to the per-user `userVideos_<id>` collection.
    #[config(default = true)]
    pub mirror_user_videos: bool,

    /// Delay between simulated upload progress steps, in milliseconds.
    #[config(default = 0)]
    pub upload_step_ms: u64,
}

impl Default for ReelzConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            conflict_policy: ConflictPolicy::Overwrite,
            mirror_user_videos: true,
            upload_step_ms: 0,
        }
    }
}

impl ReelzConfig {
    pub fn media_limits(&self) -> MediaLimits {
        MediaLimits {
            max_bytes: self.max_upload_bytes,
            max_duration_secs: self.max_duration_secs,
        }
    }

    pub fn upload_step(&self) -> Duration {
        Duration::from_millis(self.upload_step_ms)
    }
}
