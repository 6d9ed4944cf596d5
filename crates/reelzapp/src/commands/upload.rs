//! Publishing a video.
//!
//! Everything is validated before the first write: form fields, the media
//! asset against [`MediaLimits`], the optional thumbnail, and finally the
//! session. A rejected upload leaves the store untouched.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ValidationError};
use crate::media::{ImageAsset, MediaAsset, MediaLimits};
use crate::model::Video;
use crate::session::Session;
use crate::store::DataStore;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub media: Option<MediaAsset>,
    pub thumbnail: Option<ImageAsset>,
}

pub fn run<S: DataStore>(
    store: &mut S,
    session: &Session,
    request: UploadRequest,
    limits: &MediaLimits,
) -> Result<CmdResult> {
    let title = request.title.trim();
    let description = request.description.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle.into());
    }
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription.into());
    }
    let media = request.media.ok_or(ValidationError::MissingMedia)?;
    let duration = media.validate(limits)?;
    if let Some(thumbnail) = &request.thumbnail {
        thumbnail.validate()?;
    }
    let owner = session.require()?;

    let mut video = Video::new(
        title.to_string(),
        description.to_string(),
        duration,
        owner.owner_snapshot(),
    );
    if let Some(thumbnail) = request.thumbnail {
        video.thumbnail = thumbnail.source;
    }
    video.video_url = media.source;

    let mut videos = store.load_videos()?;
    videos.insert(0, video.clone());
    store.save_videos(&videos)?;
    store.mirror_user_video(&video)?;
    info!(id = %video.id, owner = %owner.nickname, duration = %video.duration, "video uploaded");

    let mut result = CmdResult::default().with_affected_videos(vec![video]);
    result.add_message(CmdMessage::success("Video published"));
    Ok(result)
}

/// Simulated transfer progress.
///
/// Yields percentages rising by `step` up to 95, then 100. It never touches
/// shared state and always completes.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    current: u8,
    step: u8,
    done: bool,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl UploadProgress {
    pub fn new(step: u8) -> Self {
        Self {
            current: 0,
            step: step.max(1),
            done: false,
        }
    }
}

impl Iterator for UploadProgress {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.done {
            return None;
        }
        if self.current >= 95 {
            self.done = true;
            self.current = 100;
        } else {
            self.current = self.current.saturating_add(self.step).min(95);
        }
        Some(self.current)
    }
}
