//! Counter reconciliation.
//!
//! Denormalized counters (`likes`, `comments`, `followers`, `following`,
//! `totalViews`) are written separately from the data they summarize, so a
//! failed second write leaves them out of step. `doctor` recomputes every
//! counter from its source of truth and, with `fix`, writes the corrections.
//! It only runs when asked; loads never reconcile.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::SessionUser;
use crate::store::DataStore;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDrift {
    /// `video <id>` or `user <nickname>`.
    pub record: String,
    pub field: &'static str,
    pub stored: u64,
    pub expected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorReport {
    pub drifts: Vec<CounterDrift>,
    pub fixed: bool,
}

fn note(drifts: &mut Vec<CounterDrift>, record: &str, field: &'static str, stored: &mut u64, expected: u64) {
    if *stored != expected {
        drifts.push(CounterDrift {
            record: record.to_string(),
            field,
            stored: *stored,
            expected,
        });
        *stored = expected;
    }
}

pub fn check<S: DataStore>(store: &mut S, fix: bool) -> Result<DoctorReport> {
    let mut videos = store.load_videos()?;
    let mut users = store.load_users()?;
    let comments = store.load_comments()?;
    let likes = store.load_likes()?;
    let follows = store.load_follows()?;

    let mut like_counts: HashMap<&str, u64> = HashMap::new();
    for video_id in likes.values().flatten() {
        *like_counts.entry(video_id.as_str()).or_default() += 1;
    }
    let mut follower_counts: HashMap<&str, u64> = HashMap::new();
    for followee in follows.values().flatten() {
        *follower_counts.entry(followee.as_str()).or_default() += 1;
    }
    let mut views_by_owner: HashMap<String, u64> = HashMap::new();
    for video in &videos {
        *views_by_owner.entry(video.user_id.clone()).or_default() += video.views;
    }

    let mut video_drifts = Vec::new();
    for video in videos.iter_mut() {
        let record = format!("video {}", video.id);
        let expected_likes = like_counts.get(video.id.as_str()).copied().unwrap_or(0);
        note(&mut video_drifts, &record, "likes", &mut video.likes, expected_likes);
        let expected_comments = comments.get(&video.id).map_or(0, |c| c.len() as u64);
        note(&mut video_drifts, &record, "comments", &mut video.comments, expected_comments);
    }

    let mut user_drifts = Vec::new();
    for user in users.iter_mut() {
        let record = format!("user {}", user.nickname);
        let followers = follower_counts.get(user.id.as_str()).copied().unwrap_or(0);
        note(&mut user_drifts, &record, "followers", &mut user.followers, followers);
        let following = follows.get(&user.id).map_or(0, |f| f.len() as u64);
        note(&mut user_drifts, &record, "following", &mut user.following, following);
        let total_views = views_by_owner.get(&user.id).copied().unwrap_or(0);
        note(&mut user_drifts, &record, "totalViews", &mut user.total_views, total_views);
    }

    if fix {
        if !video_drifts.is_empty() {
            store.save_videos(&videos)?;
        }
        if !user_drifts.is_empty() {
            store.save_users(&users)?;
            if let Some(current) = store.load_session()? {
                if let Some(user) = users.iter().find(|u| u.id == current.id) {
                    store.save_session(&SessionUser::from(user))?;
                }
            }
        }
    }

    let mut drifts = video_drifts;
    drifts.extend(user_drifts);
    let fixed = fix && !drifts.is_empty();
    if fixed {
        info!(count = drifts.len(), "repaired counters");
    }
    Ok(DoctorReport { drifts, fixed })
}

pub fn run<S: DataStore>(store: &mut S, fix: bool) -> Result<CmdResult> {
    let report = check(store, fix)?;
    let mut result = CmdResult::default();

    if report.drifts.is_empty() {
        result.add_message(CmdMessage::success("No inconsistencies found."));
        return Ok(result);
    }

    if report.fixed {
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
    } else {
        result.add_message(CmdMessage::warning(
            "Inconsistencies found (run with --fix to repair):",
        ));
    }
    for drift in &report.drifts {
        result.add_message(CmdMessage::info(format!(
            "  - {} {}: stored {}, expected {}",
            drift.record, drift.field, drift.stored, drift.expected
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::watch::{record_view, ViewTracker};
    use crate::commands::{comments, follows, likes};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::EdgeLists;

    fn fixture() -> StoreFixture {
        StoreFixture::new()
            .with_user("Alice", "alice")
            .with_user("Bob", "bob")
            .with_video("alice", "Hello")
    }

    #[test]
    fn doctor_no_inconsistencies() {
        let mut f = fixture();
        let result = run(&mut f.store, false).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("No inconsistencies"));
    }

    #[test]
    fn doctor_reports_without_fixing() {
        let mut f = fixture();
        let hello = f.video("Hello");
        let bob = f.user("bob");
        let mut likes = EdgeLists::new();
        likes.insert(bob.id.clone(), vec![hello.id.clone()]);
        f.store.save_likes(&likes).unwrap();

        let report = check(&mut f.store, false).unwrap();
        assert!(!report.fixed);
        assert_eq!(
            report.drifts,
            vec![CounterDrift {
                record: format!("video {}", hello.id),
                field: "likes",
                stored: 0,
                expected: 1,
            }]
        );
        assert_eq!(f.video("Hello").likes, 0);
    }

    #[test]
    fn doctor_repairs_counter_drift() {
        let mut f = fixture();
        let alice = f.user("alice");
        let bob = f.user("bob");
        let session = f.login("bob");

        let mut follows = EdgeLists::new();
        follows.insert(bob.id.clone(), vec![alice.id.clone()]);
        f.store.save_follows(&follows).unwrap();

        let mut videos = f.store.load_videos().unwrap();
        videos[0].views = 7;
        videos[0].comments = 3;
        f.store.save_videos(&videos).unwrap();
        assert!(session.is_logged_in());

        let result = run(&mut f.store, true).unwrap();
        assert!(result.messages[0].content.contains("fixed"));

        let alice = f.user("alice");
        assert_eq!(alice.followers, 1);
        assert_eq!(alice.total_views, 7);
        assert_eq!(f.user("bob").following, 1);
        assert_eq!(f.video("Hello").comments, 0);
        assert_eq!(f.store.load_session().unwrap().unwrap().following, 1);

        assert!(check(&mut f.store, false).unwrap().drifts.is_empty());
    }

    #[test]
    fn doctor_is_clean_after_normal_activity() {
        let mut f = fixture();
        let hello = f.video("Hello").id;
        let mut session = f.login("bob");

        likes::toggle(&mut f.store, &session, &hello).unwrap();
        comments::add(&mut f.store, &session, &hello, "Nice!").unwrap();
        follows::toggle(&mut f.store, &mut session, "alice").unwrap();
        record_view(&mut f.store, &hello, &mut ViewTracker::new()).unwrap();
        record_view(&mut f.store, &hello, &mut ViewTracker::new()).unwrap();

        let report = check(&mut f.store, false).unwrap();
        assert_eq!(report.drifts, vec![]);
        assert_eq!(f.user("alice").total_views, 2);
    }
}
