use super::helpers::normalize_email;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ReelzError, Result};
use crate::model::User;
use crate::session::Session;
use crate::store::DataStore;
use tracing::info;

/// Picks a registered email that looks like what the user meant to type.
///
/// A user qualifies when their email contains the local part of `email`, or
/// when `email` contains their local part. The first qualifying user wins.
pub fn suggest_email(users: &[User], email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default();
    users
        .iter()
        .map(|u| normalize_email(&u.email))
        .find(|candidate| {
            let candidate_local = candidate.split('@').next().unwrap_or_default();
            candidate.contains(local) || email.contains(candidate_local)
        })
}

/// Checks credentials without touching the session.
pub fn authenticate<S: DataStore>(store: &S, email: &str, password: &str) -> Result<User> {
    let users = store.load_users()?;
    if users.is_empty() {
        return Err(ReelzError::NoUsersRegistered);
    }

    let email = normalize_email(email);
    let Some(user) = users.iter().find(|u| normalize_email(&u.email) == email) else {
        return Err(ReelzError::EmailNotFound {
            suggestion: suggest_email(&users, &email),
        });
    };

    if user.password != password {
        return Err(ReelzError::WrongPassword);
    }
    Ok(user.clone())
}

pub fn login<S: DataStore>(
    store: &mut S,
    email: &str,
    password: &str,
    session: &mut Session,
) -> Result<CmdResult> {
    let user = authenticate(store, email, password)?;
    *session = Session::establish(store, &user)?;
    info!(id = %user.id, "logged in");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Logged in as @{}",
        user.nickname
    )));
    if let Some(account) = session.user() {
        result = result.with_account(account.clone());
    }
    Ok(result)
}

pub fn logout<S: DataStore>(store: &mut S, session: &mut Session) -> Result<CmdResult> {
    let was = session.user().map(|u| u.nickname.clone());
    session.clear(store)?;

    let mut result = CmdResult::default();
    match was {
        Some(nickname) => result.add_message(CmdMessage::success(format!(
            "Logged out @{}",
            nickname
        ))),
        None => result.add_message(CmdMessage::info("Not logged in")),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::register::{self, Registration};
    use crate::store::keys;
    use crate::store::memory::InMemoryStore;

    fn register(store: &mut InMemoryStore, nickname: &str, email: &str) {
        let mut session = Session::anonymous();
        register::run(
            store,
            Registration {
                name: nickname.to_uppercase(),
                nickname: nickname.into(),
                email: email.into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            },
            &mut session,
        )
        .unwrap();
    }

    #[test]
    fn no_users_registered() {
        let store = InMemoryStore::new();
        assert!(matches!(
            authenticate(&store, "a@b.co", "x"),
            Err(ReelzError::NoUsersRegistered)
        ));
    }

    #[test]
    fn register_then_authenticate_round_trip() {
        let mut store = InMemoryStore::new();
        register(&mut store, "alice", "Alice@Example.com");

        let stored = store.load_users().unwrap()[0].clone();
        let user = authenticate(&store, "  ALICE@example.com ", "secret1").unwrap();
        assert_eq!(user, stored);
        assert_eq!(user.name, "ALICE");
        assert_eq!(user.nickname, "alice");
        assert_eq!(user.email, "alice@example.com");

        let mut session = Session::anonymous();
        login(&mut store, "alice@EXAMPLE.com", "secret1", &mut session).unwrap();
        let current = session.user().unwrap();
        assert_eq!(current.id, stored.id);
        assert_eq!(current.name, stored.name);
        assert_eq!(current.nickname, stored.nickname);
        assert_eq!(current.email, stored.email);
    }

    #[test]
    fn wrong_password_is_compared_verbatim() {
        let mut store = InMemoryStore::new();
        register(&mut store, "alice", "alice@example.com");
        assert!(matches!(
            authenticate(&store, "alice@example.com", "Secret1"),
            Err(ReelzError::WrongPassword)
        ));
    }

    #[test]
    fn unknown_email_suggests_similar_account() {
        let mut store = InMemoryStore::new();
        register(&mut store, "rafael", "rafaellacerda@gmail.com");

        match authenticate(&store, "rafaellacerda@hotmail.com", "secret1") {
            Err(ReelzError::EmailNotFound { suggestion }) => {
                assert_eq!(suggestion.as_deref(), Some("rafaellacerda@gmail.com"));
            }
            other => panic!("unexpected: {other:?}"),
        }

        match authenticate(&store, "zed@nowhere.io", "secret1") {
            Err(ReelzError::EmailNotFound { suggestion }) => assert!(suggestion.is_none()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn login_stores_projection_without_password() {
        let mut store = InMemoryStore::new();
        register(&mut store, "alice", "alice@example.com");
        let mut session = Session::anonymous();

        let result = login(&mut store, "alice@example.com", "secret1", &mut session).unwrap();
        assert_eq!(result.account.unwrap().nickname, "alice");

        let raw = crate::store::backend::StorageBackend::get_item(
            store.backend(),
            keys::CURRENT_USER,
        )
        .unwrap()
        .unwrap();
        assert!(!raw.contains("password"));
        assert!(raw.contains("\"nickname\":\"alice\""));
    }

    #[test]
    fn logout_clears_session() {
        let mut store = InMemoryStore::new();
        register(&mut store, "alice", "alice@example.com");
        let mut session = Session::restore(&mut store).unwrap();
        assert!(session.is_logged_in());

        let result = logout(&mut store, &mut session).unwrap();
        assert!(result.messages[0].content.contains("@alice"));
        assert!(!session.is_logged_in());
        assert!(Session::restore(&mut store).unwrap().user().is_none());
    }
}
