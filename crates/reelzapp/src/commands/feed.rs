use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Video;
use crate::store::DataStore;

/// The home feed: listable videos in stored order (newest first), optionally
/// filtered by a case-insensitive match on title, owner nickname or description.
pub fn list<S: DataStore>(store: &S, query: Option<&str>) -> Result<CmdResult> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let videos: Vec<Video> = store
        .load_videos()?
        .into_iter()
        .filter(Video::is_listable)
        .filter(|v| needle.as_deref().map_or(true, |n| v.matches(n)))
        .collect();

    Ok(CmdResult::default().with_listed_videos(videos))
}

pub fn find<S: DataStore>(store: &S, id: &str) -> Result<Option<Video>> {
    Ok(store.load_videos()?.into_iter().find(|v| v.id == id))
}
