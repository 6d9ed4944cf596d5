//! # Domain Model
//!
//! The records persisted by the store: [`User`], [`Video`], [`Comment`] and the
//! session projection [`SessionUser`]. Field names serialize in camelCase so the
//! stored JSON keeps the layout of the original browser storage
//! (`joinDate`, `totalViews`, `uploadDate`, `userId`, ...).
//!
//! ## Denormalized Snapshots
//!
//! Two records embed copies of user data for display convenience:
//!
//! - `Video.user` is a [`VideoOwner`] snapshot taken at upload time. It is only
//!   refreshed when the owner edits their profile.
//! - `Comment.user` is the full [`SessionUser`] of the author at comment time and is
//!   never refreshed.
//!
//! ## Lenient Reads
//!
//! Counters, bios and avatars default when missing (`0`, `""`, the placeholder
//! avatar), so partially written records from older layouts still load.
//!
//! ## Identifiers
//!
//! Ids are decimal millisecond timestamps. [`new_id`] is monotonic within the
//! process: two ids requested in the same millisecond never collide.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::MediaError;

pub const DEFAULT_AVATAR: &str = "/placeholder.svg?height=40&width=40";
pub const DEFAULT_THUMBNAIL: &str = "/placeholder.svg?height=200&width=350";

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_thumbnail() -> String {
    DEFAULT_THUMBNAIL.to_string()
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generates a timestamp-derived id, bumping past the last one handed out.
pub fn new_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::SeqCst);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// A registered account as stored in `registeredUsers`.
///
/// The password is kept in plain text. That is a known limitation of the
/// storage layout, not something to build on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub join_date: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, nickname: String, email: String, password: String) -> Self {
        Self {
            id: new_id(),
            name,
            nickname,
            email,
            password,
            bio: String::new(),
            avatar: default_avatar(),
            followers: 0,
            following: 0,
            total_views: 0,
            join_date: Utc::now(),
        }
    }

    pub fn owner_snapshot(&self) -> VideoOwner {
        VideoOwner {
            id: self.id.clone(),
            name: self.name.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// The password-less projection of a [`User`], stored under `currentUser` and
/// embedded in comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub join_date: DateTime<Utc>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
            followers: user.followers,
            following: user.following,
            total_views: user.total_views,
            join_date: user.join_date,
        }
    }
}

impl SessionUser {
    pub fn owner_snapshot(&self) -> VideoOwner {
        VideoOwner {
            id: self.id.clone(),
            name: self.name.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Owner fields copied into a [`Video`] at upload time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOwner {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
}

/// Length of a video in whole seconds, written as `M:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VideoDuration(u32);

impl VideoDuration {
    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    /// Floors a measured duration, the way a media element reports it.
    pub fn from_secs_f64(secs: f64) -> Result<Self, MediaError> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(MediaError::InvalidDuration(secs.to_string()));
        }
        Ok(Self(secs.floor() as u32))
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for VideoDuration {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MediaError::InvalidDuration(s.to_string());
        let (minutes, seconds) = s.trim().split_once(':').ok_or_else(invalid)?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if seconds >= 60 {
            return Err(invalid());
        }
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for VideoDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VideoDuration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An uploaded video's metadata as stored in `allVideos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_thumbnail")]
    pub thumbnail: String,
    #[serde(default)]
    pub duration: VideoDuration,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub upload_date: NaiveDate,
    pub user_id: String,
    pub user: VideoOwner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Video {
    pub fn new(
        title: String,
        description: String,
        duration: VideoDuration,
        owner: VideoOwner,
    ) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            thumbnail: default_thumbnail(),
            duration,
            views: 0,
            likes: 0,
            comments: 0,
            upload_date: Utc::now().date_naive(),
            user_id: owner.id.clone(),
            user: owner,
            video_url: None,
        }
    }

    /// Whether the record carries enough data to be shown in a feed.
    pub fn is_listable(&self) -> bool {
        !self.id.is_empty()
            && !self.title.is_empty()
            && !self.user.name.is_empty()
            && !self.user.nickname.is_empty()
    }

    /// Case-insensitive match on title, description or owner nickname.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.user.nickname.to_lowercase().contains(needle)
    }
}

/// A comment under a video, stored in `videoComments[videoId]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub user: SessionUser,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub date: DateTime<Utc>,
    // Declared by the layout, never populated.
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
}

impl Comment {
    pub fn new(video_id: String, author: SessionUser, content: String) -> Self {
        Self {
            id: new_id(),
            video_id,
            user_id: author.id.clone(),
            user: author,
            content,
            likes: 0,
            date: Utc::now(),
            replies: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_when_requested_back_to_back() {
        let a = new_id();
        let b = new_id();
        let c = new_id();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(b.parse::<i64>().unwrap() > a.parse::<i64>().unwrap());
    }

    #[test]
    fn duration_formats_and_parses() {
        let d: VideoDuration = "4:59".parse().unwrap();
        assert_eq!(d.as_secs(), 299);
        assert_eq!(d.to_string(), "4:59");
        assert_eq!(VideoDuration::from_secs(65).to_string(), "1:05");
        assert!("4:60".parse::<VideoDuration>().is_err());
        assert!("abc".parse::<VideoDuration>().is_err());
    }

    #[test]
    fn duration_out_of_range_is_an_error() {
        assert!(matches!(
            "99999999:00".parse::<VideoDuration>(),
            Err(MediaError::InvalidDuration(_))
        ));
        assert!("71582789:00".parse::<VideoDuration>().is_err());
        let max: VideoDuration = "71582788:15".parse().unwrap();
        assert_eq!(max.as_secs(), u32::MAX);
    }

    #[test]
    fn duration_floors_measured_seconds() {
        let d = VideoDuration::from_secs_f64(299.9).unwrap();
        assert_eq!(d.to_string(), "4:59");
        assert!(VideoDuration::from_secs_f64(f64::NAN).is_err());
    }

    #[test]
    fn user_reads_leniently_from_partial_json() {
        let json = r#"{"id":"1","name":"Ann","nickname":"ann","email":"a@b.co","password":"x"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.followers, 0);
        assert_eq!(user.avatar, DEFAULT_AVATAR);
        assert_eq!(user.bio, "");
    }

    #[test]
    fn video_serializes_in_camel_case() {
        let owner = VideoOwner {
            id: "1".into(),
            name: "Ann".into(),
            nickname: "ann".into(),
            avatar: DEFAULT_AVATAR.into(),
        };
        let video = Video::new("T".into(), "D".into(), VideoDuration::from_secs(90), owner);
        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["userId"], "1");
        assert_eq!(value["duration"], "1:30");
        assert!(value.get("uploadDate").is_some());
        assert!(value.get("videoUrl").is_none());
    }

    #[test]
    fn session_projection_drops_password() {
        let user = User::new("Ann".into(), "ann".into(), "a@b.co".into(), "secret".into());
        let session = SessionUser::from(&user);
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["nickname"], "ann");
    }

    #[test]
    fn listable_requires_owner_names() {
        let owner = VideoOwner {
            id: "1".into(),
            name: String::new(),
            nickname: "ann".into(),
            avatar: DEFAULT_AVATAR.into(),
        };
        let video = Video::new("T".into(), "D".into(), VideoDuration::default(), owner);
        assert!(!video.is_listable());
    }
}
