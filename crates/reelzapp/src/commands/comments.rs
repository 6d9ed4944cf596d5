use super::helpers::video_position;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ValidationError};
use crate::model::Comment;
use crate::session::Session;
use crate::store::DataStore;
use tracing::debug;

/// Adds a comment at the top of the video's thread and bumps its counter.
pub fn add<S: DataStore>(
    store: &mut S,
    session: &Session,
    video_id: &str,
    content: &str,
) -> Result<CmdResult> {
    let author = session.require()?;
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::EmptyComment.into());
    }

    let mut videos = store.load_videos()?;
    let pos = video_position(&videos, video_id)?;

    let comment = Comment::new(video_id.to_string(), author.clone(), content.to_string());
    let mut comments = store.load_comments()?;
    comments
        .entry(video_id.to_string())
        .or_default()
        .insert(0, comment);
    store.save_comments(&comments)?;

    videos[pos].comments += 1;
    store.save_videos(&videos)?;
    let video = videos.swap_remove(pos);
    debug!(video_id, comments = video.comments, "comment added");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Comment posted"));
    Ok(result.with_affected_videos(vec![video]))
}
