use super::helpers::{
    email_taken, has_edge, is_valid_email, nickname_taken, normalize_email, normalize_nickname,
    user_position, MIN_NICKNAME_LEN,
};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FieldError, Result, ValidationError};
use crate::media::ImageAsset;
use crate::model::{SessionUser, Video};
use crate::session::Session;
use crate::store::DataStore;
use tracing::info;

/// A user's public page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePage {
    pub user: SessionUser,
    /// The user's videos, newest first.
    pub videos: Vec<Video>,
    /// Whether the viewer follows this user.
    pub is_following: bool,
    /// Whether the viewer is looking at their own profile.
    pub is_own: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    Found(Box<ProfilePage>),
    NotFound { nickname: String },
}

/// Looks a profile up by exact nickname.
pub fn view<S: DataStore>(store: &S, nickname: &str, session: &Session) -> Result<ProfileView> {
    let users = store.load_users()?;
    let Some(user) = users.iter().find(|u| u.nickname == nickname) else {
        return Ok(ProfileView::NotFound {
            nickname: nickname.to_string(),
        });
    };

    let videos: Vec<Video> = store
        .load_videos()?
        .into_iter()
        .filter(|v| v.user_id == user.id)
        .collect();

    let (is_following, is_own) = match session.user_id() {
        Some(viewer) => (
            has_edge(&store.load_follows()?, viewer, &user.id),
            viewer == user.id,
        ),
        None => (false, false),
    };

    Ok(ProfileView::Found(Box::new(ProfilePage {
        user: SessionUser::from(user),
        videos,
        is_following,
        is_own,
    })))
}

/// The profile edit form. All text fields are submitted in full.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub bio: String,
    /// A replacement avatar; `None` keeps the current one.
    pub avatar: Option<ImageAsset>,
}

impl ProfileUpdate {
    /// Pre-fills the form with the user's current values.
    pub fn from_current(user: &SessionUser) -> Self {
        Self {
            name: user.name.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            avatar: None,
        }
    }
}

fn validate<S: DataStore>(
    store: &S,
    self_id: &str,
    patch: &ProfileUpdate,
) -> Result<Vec<FieldError>> {
    let mut errors = Vec::new();
    let users = store.load_users()?;

    if patch.name.trim().is_empty() {
        errors.push(FieldError::new("name", ValidationError::EmptyName.to_string()));
    }

    let nickname = normalize_nickname(&patch.nickname);
    if patch.nickname.trim().is_empty() {
        errors.push(FieldError::new("nickname", "Nickname is required"));
    } else if nickname.chars().count() < MIN_NICKNAME_LEN {
        errors.push(FieldError::new(
            "nickname",
            ValidationError::NicknameTooShort(MIN_NICKNAME_LEN).to_string(),
        ));
    } else if nickname_taken(&users, &nickname, Some(self_id)) {
        errors.push(FieldError::new(
            "nickname",
            ValidationError::DuplicateNickname.to_string(),
        ));
    }

    let email = normalize_email(&patch.email);
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError::new("email", ValidationError::InvalidEmail.to_string()));
    } else if email_taken(&users, &email, Some(self_id)) {
        errors.push(FieldError::new("email", ValidationError::DuplicateEmail.to_string()));
    }

    if let Some(avatar) = &patch.avatar {
        if let Err(err) = avatar.validate() {
            errors.push(FieldError::new("avatar", err.to_string()));
        }
    }

    Ok(errors)
}

/// Applies a profile edit and propagates it to the session and to the owner
/// snapshot of every video the user uploaded.
pub fn update<S: DataStore>(
    store: &mut S,
    session: &mut Session,
    patch: ProfileUpdate,
) -> Result<CmdResult> {
    let self_id = session.require()?.id.clone();

    let errors = validate(store, &self_id, &patch)?;
    if !errors.is_empty() {
        return Err(ValidationError::Fields(errors).into());
    }

    let mut users = store.load_users()?;
    let pos = user_position(&users, &self_id)?;
    let user = &mut users[pos];
    user.name = patch.name.trim().to_string();
    user.nickname = normalize_nickname(&patch.nickname);
    user.email = normalize_email(&patch.email);
    user.bio = patch.bio.trim().to_string();
    if let Some(avatar) = patch.avatar {
        user.avatar = avatar.source;
    }
    let updated = user.clone();
    store.save_users(&users)?;
    session.refresh(store, &updated)?;

    let mut videos = store.load_videos()?;
    let mut touched = Vec::new();
    for video in videos.iter_mut().filter(|v| v.user_id == updated.id) {
        video.user.name = updated.name.clone();
        video.user.nickname = updated.nickname.clone();
        video.user.avatar = updated.avatar.clone();
        touched.push(video.clone());
    }
    if !touched.is_empty() {
        store.save_videos(&videos)?;
    }
    info!(id = %updated.id, videos = touched.len(), "profile updated");

    let mut result = CmdResult::default()
        .with_affected_videos(touched)
        .with_account(SessionUser::from(&updated));
    result.add_message(CmdMessage::success("Profile updated"));
    Ok(result)
}
