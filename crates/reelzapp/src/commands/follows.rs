use super::helpers::{step_counter, toggle_edge, user_position};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ReelzError, Result};
use crate::model::SessionUser;
use crate::session::Session;
use crate::store::DataStore;
use tracing::debug;

/// Follows the user with `nickname`, or unfollows if already following.
///
/// Adjusts the target's `followers` and the follower's `following`, then
/// refreshes the stored session so the follower's own count stays current.
pub fn toggle<S: DataStore>(
    store: &mut S,
    session: &mut Session,
    nickname: &str,
) -> Result<CmdResult> {
    let follower_id = session.require()?.id.clone();

    let mut users = store.load_users()?;
    let target_pos = users
        .iter()
        .position(|u| u.nickname == nickname)
        .ok_or_else(|| ReelzError::UserNotFound(nickname.to_string()))?;
    if users[target_pos].id == follower_id {
        return Err(ReelzError::CannotFollowSelf);
    }
    let follower_pos = user_position(&users, &follower_id)?;
    let target_id = users[target_pos].id.clone();

    let mut follows = store.load_follows()?;
    let following = toggle_edge(&mut follows, &follower_id, &target_id);
    store.save_follows(&follows)?;

    step_counter(&mut users[target_pos].followers, following);
    step_counter(&mut users[follower_pos].following, following);
    store.save_users(&users)?;

    let follower = users[follower_pos].clone();
    session.refresh(store, &follower)?;

    let target = SessionUser::from(&users[target_pos]);
    debug!(follower = %follower_id, target = %target_id, following, "follow toggled");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(if following {
        format!("Following @{}", target.nickname)
    } else {
        format!("Unfollowed @{}", target.nickname)
    }));
    Ok(result.with_listed_users(vec![target]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_user("Alice", "alice")
            .with_user("Bob", "bob")
    }

    #[test]
    fn follow_then_unfollow_is_symmetric() {
        let mut f = fixture();
        let mut session = f.login("bob");

        let result = toggle(&mut f.store, &mut session, "alice").unwrap();
        assert_eq!(result.listed_users[0].followers, 1);
        assert_eq!(f.user("alice").followers, 1);
        assert_eq!(f.user("bob").following, 1);
        assert_eq!(session.user().unwrap().following, 1);

        let alice = f.user("alice");
        let bob = f.user("bob");
        assert_eq!(f.store.load_follows().unwrap()[&bob.id], vec![alice.id]);

        toggle(&mut f.store, &mut session, "alice").unwrap();
        assert_eq!(f.user("alice").followers, 0);
        assert_eq!(f.user("bob").following, 0);
        assert_eq!(f.store.load_session().unwrap().unwrap().following, 0);
    }

    #[test]
    fn cannot_follow_self() {
        let mut f = fixture();
        let mut session = f.login("alice");
        let err = toggle(&mut f.store, &mut session, "alice").unwrap_err();
        assert!(matches!(err, ReelzError::CannotFollowSelf));
        assert!(f.store.load_follows().unwrap().is_empty());
    }

    #[test]
    fn unknown_target() {
        let mut f = fixture();
        let mut session = f.login("alice");
        let err = toggle(&mut f.store, &mut session, "ghost").unwrap_err();
        assert!(matches!(err, ReelzError::UserNotFound(_)));
    }

    #[test]
    fn requires_login() {
        let mut f = fixture();
        let err = toggle(&mut f.store, &mut Session::anonymous(), "alice").unwrap_err();
        assert!(matches!(err, ReelzError::NotLoggedIn));
    }
}
