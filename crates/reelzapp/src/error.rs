use thiserror::Error;

/// Problems with a media file selected for upload (or an avatar/thumbnail image).
///
/// All of these are raised before anything is written to the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("Please select a valid video file (got {0})")]
    NotAVideo(String),

    #[error("Please select a valid image (got {0})")]
    NotAnImage(String),

    #[error("The file is too large: {size} bytes (maximum {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("The video must be at most {max} long (got {actual})")]
    TooLong { actual: String, max: String },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// A single failed field in a multi-field form (profile edit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Nickname must be at least {0} characters")]
    NicknameTooShort(usize),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("This email is already registered")]
    DuplicateEmail,

    #[error("This nickname is already taken")]
    DuplicateNickname,

    #[error("Title is required")]
    EmptyTitle,

    #[error("Description is required")]
    EmptyDescription,

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Please select a video file")]
    MissingMedia,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("{}", format_fields(.0))]
    Fields(Vec<FieldError>),
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ReelzError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No users registered yet. Please create an account")]
    NoUsersRegistered,

    #[error("{}", email_not_found_message(.suggestion))]
    EmailNotFound { suggestion: Option<String> },

    #[error("Wrong password")]
    WrongPassword,

    #[error("You need to log in first")]
    NotLoggedIn,

    #[error("You cannot follow yourself")]
    CannotFollowSelf,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    #[error("'{key}' was changed by another writer since it was read")]
    Conflict { key: String },
}

fn email_not_found_message(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(email) => format!("Email not found. Did you mean: {}?", email),
        None => "Email not found. Check your credentials or create an account".to_string(),
    }
}

impl From<MediaError> for ReelzError {
    fn from(err: MediaError) -> Self {
        ReelzError::Validation(ValidationError::Media(err))
    }
}

pub type Result<T> = std::result::Result<T, ReelzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_not_found_mentions_suggestion() {
        let err = ReelzError::EmailNotFound {
            suggestion: Some("alice@example.com".into()),
        };
        assert!(err.to_string().contains("alice@example.com"));

        let err = ReelzError::EmailNotFound { suggestion: None };
        assert!(err.to_string().starts_with("Email not found"));
    }

    #[test]
    fn field_errors_are_joined() {
        let err = ValidationError::Fields(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Please enter a valid email"),
        ]);
        assert_eq!(
            err.to_string(),
            "name: Name is required; email: Please enter a valid email"
        );
    }
}
