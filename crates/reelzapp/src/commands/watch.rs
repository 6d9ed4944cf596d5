//! The video page.
//!
//! Opening a video counts one view per visit. A visit is represented by a
//! [`ViewTracker`]: the caller creates one when the page opens and passes it to
//! every call made while the page stays open, so re-rendering never counts
//! twice.

use super::helpers::{has_edge, video_position};
use crate::error::Result;
use crate::model::{Comment, SessionUser, Video};
use crate::session::Session;
use crate::store::DataStore;
use std::collections::HashSet;
use tracing::debug;

/// Videos already counted during one page visit.
#[derive(Debug, Clone, Default)]
pub struct ViewTracker {
    viewed: HashSet<String>,
}

impl ViewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_viewed(&self, video_id: &str) -> bool {
        self.viewed.contains(video_id)
    }
}

/// Increments `views` and the owner's `totalViews` unless this visit already
/// counted the video. Returns whether a view was recorded.
pub fn record_view<S: DataStore>(
    store: &mut S,
    video_id: &str,
    tracker: &mut ViewTracker,
) -> Result<bool> {
    if tracker.has_viewed(video_id) {
        return Ok(false);
    }

    let mut videos = store.load_videos()?;
    let pos = video_position(&videos, video_id)?;
    videos[pos].views += 1;
    store.save_videos(&videos)?;

    let owner_id = &videos[pos].user_id;
    let mut users = store.load_users()?;
    if let Some(owner) = users.iter_mut().find(|u| &u.id == owner_id) {
        owner.total_views += 1;
        let owner = SessionUser::from(&*owner);
        store.save_users(&users)?;
        // The owner may be the one logged in
        if store.load_session()?.is_some_and(|s| s.id == owner.id) {
            store.save_session(&owner)?;
        }
    }

    tracker.viewed.insert(video_id.to_string());
    debug!(video_id, views = videos[pos].views, "view recorded");
    Ok(true)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPage {
    pub video: Video,
    /// Comments, newest first.
    pub comments: Vec<Comment>,
    /// Whether the viewer liked this video.
    pub liked: bool,
    /// Whether the viewer follows the owner.
    pub following_owner: bool,
    /// Current follower count of the owner.
    pub owner_followers: u64,
    /// Every other listable video.
    pub related: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoView {
    Found(Box<VideoPage>),
    NotFound { id: String },
}

pub fn watch<S: DataStore>(
    store: &mut S,
    id: &str,
    session: &Session,
    tracker: &mut ViewTracker,
) -> Result<VideoView> {
    let videos = store.load_videos()?;
    if !videos.iter().any(|v| v.id == id) {
        return Ok(VideoView::NotFound { id: id.to_string() });
    }
    record_view(store, id, tracker)?;

    let mut video = None;
    let mut related = Vec::new();
    for v in store.load_videos()? {
        if v.id == id {
            video = Some(v);
        } else if v.is_listable() {
            related.push(v);
        }
    }
    let Some(video) = video else {
        return Ok(VideoView::NotFound { id: id.to_string() });
    };

    let comments = store.load_comments()?.remove(id).unwrap_or_default();
    let owner_followers = store
        .load_users()?
        .iter()
        .find(|u| u.id == video.user_id)
        .map_or(0, |u| u.followers);

    let (liked, following_owner) = match session.user_id() {
        Some(viewer) => (
            has_edge(&store.load_likes()?, viewer, id),
            has_edge(&store.load_follows()?, viewer, &video.user_id),
        ),
        None => (false, false),
    };

    Ok(VideoView::Found(Box::new(VideoPage {
        video,
        comments,
        liked,
        following_owner,
        owner_followers,
        related,
    })))
}
