use crate::error::{ReelzError, Result};
use crate::model::{User, Video};
use crate::store::EdgeLists;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

pub const MIN_NICKNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercases and drops everything that is not `[a-z0-9]`.
pub fn normalize_nickname(nickname: &str) -> String {
    nickname
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn email_taken(users: &[User], email: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .filter(|u| Some(u.id.as_str()) != except_id)
        .any(|u| normalize_email(&u.email) == email)
}

pub fn nickname_taken(users: &[User], nickname: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .filter(|u| Some(u.id.as_str()) != except_id)
        .any(|u| u.nickname.trim().to_lowercase() == nickname)
}

pub fn user_position(users: &[User], id: &str) -> Result<usize> {
    users
        .iter()
        .position(|u| u.id == id)
        .ok_or_else(|| ReelzError::UserNotFound(id.to_string()))
}

pub fn video_position(videos: &[Video], id: &str) -> Result<usize> {
    videos
        .iter()
        .position(|v| v.id == id)
        .ok_or_else(|| ReelzError::VideoNotFound(id.to_string()))
}

pub fn has_edge(edges: &EdgeLists, from: &str, to: &str) -> bool {
    edges
        .get(from)
        .is_some_and(|targets| targets.iter().any(|t| t == to))
}

/// Flips `from -> to` and reports whether the edge now exists.
pub fn toggle_edge(edges: &mut EdgeLists, from: &str, to: &str) -> bool {
    let targets = edges.entry(from.to_string()).or_default();
    if let Some(pos) = targets.iter().position(|t| t == to) {
        targets.remove(pos);
        false
    } else {
        targets.push(to.to_string());
        true
    }
}

/// Applies a +1/-1 step without going below zero.
pub fn step_counter(counter: &mut u64, up: bool) {
    if up {
        *counter += 1;
    } else {
        *counter = counter.saturating_sub(1);
    }
}
