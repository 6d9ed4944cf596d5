use super::helpers::{step_counter, toggle_edge, video_position};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::DataStore;
use tracing::debug;

/// Likes the video, or removes the like if the user already liked it.
///
/// The edge list and the `likes` counter are two separate writes; if the
/// second fails the counter lags until `doctor --fix` runs.
pub fn toggle<S: DataStore>(store: &mut S, session: &Session, video_id: &str) -> Result<CmdResult> {
    let user = session.require()?;

    let mut videos = store.load_videos()?;
    let pos = video_position(&videos, video_id)?;

    let mut likes = store.load_likes()?;
    let liked = toggle_edge(&mut likes, &user.id, video_id);
    store.save_likes(&likes)?;

    step_counter(&mut videos[pos].likes, liked);
    store.save_videos(&videos)?;
    let video = videos.swap_remove(pos);
    debug!(video_id, liked, likes = video.likes, "like toggled");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(if liked {
        format!("Liked \"{}\"", video.title)
    } else {
        format!("Removed like from \"{}\"", video.title)
    }));
    Ok(result.with_affected_videos(vec![video]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelzError;
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_user("Alice", "alice")
            .with_user("Bob", "bob")
            .with_video("alice", "Hello")
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut f = fixture();
        let id = f.video("Hello").id;
        let session = f.login("bob");

        toggle(&mut f.store, &session, &id).unwrap();
        assert_eq!(f.video("Hello").likes, 1);
        let bob = f.user("bob");
        assert_eq!(f.store.load_likes().unwrap()[&bob.id], vec![id.clone()]);

        toggle(&mut f.store, &session, &id).unwrap();
        assert_eq!(f.video("Hello").likes, 0);
        assert!(f.store.load_likes().unwrap()[&bob.id].is_empty());
    }

    #[test]
    fn likes_from_two_users_add_up() {
        let mut f = fixture();
        let id = f.video("Hello").id;
        let bob = f.login("bob");
        toggle(&mut f.store, &bob, &id).unwrap();
        let alice = f.login("alice");
        toggle(&mut f.store, &alice, &id).unwrap();
        assert_eq!(f.video("Hello").likes, 2);
    }

    #[test]
    fn unknown_video_writes_nothing() {
        let mut f = fixture();
        let session = f.login("bob");
        let err = toggle(&mut f.store, &session, "missing").unwrap_err();
        assert!(matches!(err, ReelzError::VideoNotFound(_)));
        assert!(f.store.load_likes().unwrap().is_empty());
    }

    #[test]
    fn failed_counter_write_leaves_edge_in_place() {
        let mut f = fixture();
        let id = f.video("Hello").id;
        let session = f.login("bob");
        f.store
            .backend()
            .fail_writes_to(Some(crate::store::keys::ALL_VIDEOS));

        assert!(toggle(&mut f.store, &session, &id).is_err());
        f.store.backend().fail_writes_to(None);

        let bob = f.user("bob");
        assert_eq!(f.store.load_likes().unwrap()[&bob.id], vec![id]);
        assert_eq!(f.video("Hello").likes, 0);
    }

    #[test]
    fn requires_login() {
        let mut f = fixture();
        let id = f.video("Hello").id;
        let err = toggle(&mut f.store, &Session::anonymous(), &id).unwrap_err();
        assert!(matches!(err, ReelzError::NotLoggedIn));
    }
}
