use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{SessionUser, User, Video};
use crate::store::DataStore;

fn user_matches(user: &User, needle: &str) -> bool {
    user.name.to_lowercase().contains(needle)
        || user.nickname.to_lowercase().contains(needle)
        || user.bio.to_lowercase().contains(needle)
}

/// Case-insensitive substring search over videos (title, description, owner
/// nickname) and users (name, nickname, bio). A blank query finds nothing.
pub fn run<S: DataStore>(store: &S, query: &str) -> Result<CmdResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(CmdResult::default());
    }

    let videos: Vec<Video> = store
        .load_videos()?
        .into_iter()
        .filter(|v| !v.title.is_empty() && v.matches(&needle))
        .collect();

    let users: Vec<SessionUser> = store
        .load_users()?
        .iter()
        .filter(|u| !u.name.is_empty() && !u.nickname.is_empty())
        .filter(|u| user_matches(u, &needle))
        .map(SessionUser::from)
        .collect();

    let mut result = CmdResult::default();
    if videos.is_empty() && users.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No results for \"{}\"",
            query.trim()
        )));
    }
    Ok(result.with_listed_videos(videos).with_listed_users(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        let mut f = StoreFixture::new()
            .with_user("Alice Smith", "alice")
            .with_user("Bob", "bob")
            .with_video("alice", "Cooking pasta")
            .with_video("bob", "Skate tricks");
        let mut users = f.store.load_users().unwrap();
        users[1].bio = "I love pasta".into();
        f.store.save_users(&users).unwrap();
        f
    }

    #[test]
    fn blank_query_finds_nothing() {
        let f = fixture();
        let result = run(&f.store, "   ").unwrap();
        assert!(result.listed_videos.is_empty());
        assert!(result.listed_users.is_empty());
        assert!(result.messages.is_empty());
    }

    #[test]
    fn matches_across_fields() {
        let f = fixture();

        let result = run(&f.store, "PASTA").unwrap();
        assert_eq!(result.listed_videos.len(), 1);
        assert_eq!(result.listed_users.len(), 1);
        assert_eq!(result.listed_users[0].nickname, "bob");

        let result = run(&f.store, "smith").unwrap();
        assert!(result.listed_videos.is_empty());
        assert_eq!(result.listed_users[0].nickname, "alice");

        let result = run(&f.store, "bob").unwrap();
        assert_eq!(result.listed_videos[0].title, "Skate tricks");
    }

    #[test]
    fn no_results_message() {
        let f = fixture();
        let result = run(&f.store, "zzz").unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("zzz"));
    }
}
