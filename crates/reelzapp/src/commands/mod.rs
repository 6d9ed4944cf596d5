//! # Command Layer
//!
//! This module contains the **core business logic** of reelz. Each feature lives in its
//! own submodule and implements plain Rust functions over the [`DataStore`] contract.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate input and enforce uniqueness rules
//! - Perform the read-modify-write cycle on whole collections
//! - Keep denormalized counters and snapshots in step with the edge lists
//! - Return structured data (`CmdResult` or a dedicated view type)
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Any terminal I/O**: No stdout, stderr, colors or formatting
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Structured Returns
//!
//! Mutations return [`CmdResult`]:
//! - `affected_videos`: Videos that were created or changed
//! - `listed_videos` / `listed_users`: Things to display
//! - `account`: The session projection after login, registration or an edit
//! - `messages`: Structured messages with levels (info, success, warning, error)
//!
//! Page-like reads return dedicated types with an explicit not-found state
//! ([`profile::ProfileView`], [`watch::VideoView`]) instead of errors.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests run against
//! `InMemoryStore` (see `store::memory::fixtures`) and cover every branch, including
//! the failure cases that must leave the store untouched.
//!
//! ## Command Modules
//!
//! - [`register`]: Create accounts
//! - [`auth`]: Log in and out
//! - [`profile`]: View and edit profiles
//! - [`upload`]: Publish videos
//! - [`feed`]: List and find videos
//! - [`watch`]: The video page, with view counting
//! - [`likes`]: Toggle likes
//! - [`follows`]: Toggle follows
//! - [`comments`]: Add comments
//! - [`search`]: Search videos and users
//! - [`doctor`]: Verify and fix counter drift
//! - [`helpers`]: Shared lookups and normalization
//!
//! [`DataStore`]: crate::store::DataStore

use crate::model::{SessionUser, Video};
use serde::Serialize;

pub mod auth;
pub mod comments;
pub mod doctor;
pub mod feed;
pub mod follows;
pub mod helpers;
pub mod likes;
pub mod profile;
pub mod register;
pub mod search;
pub mod upload;
pub mod watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_videos: Vec<Video>,
    pub listed_videos: Vec<Video>,
    pub listed_users: Vec<SessionUser>,
    pub account: Option<SessionUser>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_videos(mut self, videos: Vec<Video>) -> Self {
        self.affected_videos = videos;
        self
    }

    pub fn with_listed_videos(mut self, videos: Vec<Video>) -> Self {
        self.listed_videos = videos;
        self
    }

    pub fn with_listed_users(mut self, users: Vec<SessionUser>) -> Self {
        self.listed_users = users;
        self
    }

    pub fn with_account(mut self, account: SessionUser) -> Self {
        self.account = Some(account);
        self
    }
}
