use super::helpers::{
    email_taken, is_valid_email, nickname_taken, normalize_email, normalize_nickname,
    MIN_NICKNAME_LEN, MIN_PASSWORD_LEN,
};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ValidationError};
use crate::model::User;
use crate::session::Session;
use crate::store::DataStore;
use tracing::info;

/// The sign-up form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn validate(form: &Registration, nickname: &str) -> std::result::Result<(), ValidationError> {
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if nickname.chars().count() < MIN_NICKNAME_LEN {
        return Err(ValidationError::NicknameTooShort(MIN_NICKNAME_LEN));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if form.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !is_valid_email(&normalize_email(&form.email)) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Creates an account and logs it in.
pub fn run<S: DataStore>(
    store: &mut S,
    form: Registration,
    session: &mut Session,
) -> Result<CmdResult> {
    let nickname = normalize_nickname(&form.nickname);
    validate(&form, &nickname)?;

    let email = normalize_email(&form.email);
    let mut users = store.load_users()?;
    if email_taken(&users, &email, None) {
        return Err(ValidationError::DuplicateEmail.into());
    }
    if nickname_taken(&users, &nickname, None) {
        return Err(ValidationError::DuplicateNickname.into());
    }

    let user = User::new(form.name.trim().to_string(), nickname, email, form.password);
    users.push(user.clone());
    store.save_users(&users)?;
    info!(id = %user.id, nickname = %user.nickname, "registered user");

    *session = Session::establish(store, &user)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Welcome to reelz, @{}!",
        user.nickname
    )));
    if let Some(account) = session.user() {
        result = result.with_account(account.clone());
    }
    Ok(result)
}
