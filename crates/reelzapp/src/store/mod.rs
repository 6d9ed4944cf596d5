//! # Storage Layer
//!
//! This module defines the Local Data Store: a typed contract ([`DataStore`]) over
//! a flat namespace of named JSON documents held by a raw [`StorageBackend`].
//!
//! ## Collections
//!
//! | Key | Shape |
//! |-----|-------|
//! | `registeredUsers` | array of `User` |
//! | `currentUser` | one `SessionUser`, or absent |
//! | `allVideos` | array of `Video`, newest first |
//! | `userVideos_<userId>` | array of `Video` (write-only mirror of the owner's uploads) |
//! | `videoComments` | map of videoId to array of `Comment`, newest first |
//! | `userLikes` | map of userId to array of videoId |
//! | `followData` | map of followerId to array of followeeId |
//!
//! ## Read-Modify-Write
//!
//! Every operation loads a whole collection, transforms it, and writes the whole
//! collection back. There is no partial or indexed update and no transaction that
//! spans two collections: an operation that writes two keys (like toggling a like)
//! can fail between the writes and leave a counter out of step with its edge list.
//! The `doctor` command finds and repairs such drift.
//!
//! ## Lenient Reads
//!
//! A collection that is missing, is not valid JSON, or has the wrong container
//! shape reads as empty. Malformed elements inside a valid container are skipped.
//! Both cases are logged with `warn!` and never surface as errors.
//!
//! ## Revision Stamps
//!
//! Each key has a companion `<key>.rev` counter bumped on every write. A store
//! remembers the revision it saw when it last read a key; if the stored revision
//! moved on before the write (another process or another store instance wrote in
//! between), the [`ConflictPolicy`] decides: `Overwrite` logs and writes anyway
//! (last write wins), `Reject` fails with `ReelzError::Conflict`.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production store over a data directory.
//! - [`memory::InMemoryStore`]: for testing logic without filesystem I/O.

use crate::error::Result;
use crate::model::{Comment, SessionUser, User, Video};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod local_store;
pub mod mem_backend;
pub mod memory;

/// Storage keys, kept identical to the original browser layout.
pub mod keys {
    pub const REGISTERED_USERS: &str = "registeredUsers";
    pub const CURRENT_USER: &str = "currentUser";
    pub const ALL_VIDEOS: &str = "allVideos";
    pub const VIDEO_COMMENTS: &str = "videoComments";
    pub const USER_LIKES: &str = "userLikes";
    pub const FOLLOW_DATA: &str = "followData";

    pub fn user_videos(user_id: &str) -> String {
        format!("userVideos_{}", user_id)
    }

    pub fn revision(key: &str) -> String {
        format!("{}.rev", key)
    }
}

/// Comments grouped by video id.
pub type CommentsByVideo = BTreeMap<String, Vec<Comment>>;

/// Per-actor edge lists: `userLikes` (user to liked videos) and
/// `followData` (follower to followees).
pub type EdgeLists = BTreeMap<String, Vec<String>>;

/// What to do when a key changed between our read and our write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Log a warning and write anyway (last write wins).
    #[default]
    Overwrite,
    /// Abort the write with `ReelzError::Conflict`.
    Reject,
}

/// Typed access to the named collections.
///
/// Loads never fail on malformed data (they fall back to empty); they only fail
/// on backend I/O errors. Saves replace the whole collection.
pub trait DataStore {
    fn load_users(&self) -> Result<Vec<User>>;
    fn save_users(&mut self, users: &[User]) -> Result<()>;

    fn load_videos(&self) -> Result<Vec<Video>>;
    fn save_videos(&mut self, videos: &[Video]) -> Result<()>;

    /// Prepend a video to the owner's `userVideos_<id>` mirror.
    /// This data is never read back by any feature.
    fn mirror_user_video(&mut self, video: &Video) -> Result<()>;

    fn load_comments(&self) -> Result<CommentsByVideo>;
    fn save_comments(&mut self, comments: &CommentsByVideo) -> Result<()>;

    fn load_likes(&self) -> Result<EdgeLists>;
    fn save_likes(&mut self, likes: &EdgeLists) -> Result<()>;

    fn load_follows(&self) -> Result<EdgeLists>;
    fn save_follows(&mut self, follows: &EdgeLists) -> Result<()>;

    fn load_session(&self) -> Result<Option<SessionUser>>;
    fn save_session(&mut self, user: &SessionUser) -> Result<()>;
    fn clear_session(&mut self) -> Result<()>;
}
