//! # Session
//!
//! The logged-in user is an explicit value rather than ambient state. Operations
//! that need an actor take a `&Session`; callers resolve it once with
//! [`Session::restore`] and pass it down.
//!
//! The persisted form is the `currentUser` key, holding a [`SessionUser`]
//! projection. A stored projection without a name or nickname is treated as
//! corrupt: it is removed and the session starts anonymous.

use crate::error::{ReelzError, Result};
use crate::model::{SessionUser, User};
use crate::store::DataStore;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    current: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Persists the projection of `user` as the current session.
    pub fn establish<S: DataStore>(store: &mut S, user: &User) -> Result<Self> {
        let projection = SessionUser::from(user);
        store.save_session(&projection)?;
        Ok(Self {
            current: Some(projection),
        })
    }

    /// Loads the stored session, discarding it if it is unusable.
    pub fn restore<S: DataStore>(store: &mut S) -> Result<Self> {
        match store.load_session()? {
            Some(user) if !user.name.is_empty() && !user.nickname.is_empty() => Ok(Self {
                current: Some(user),
            }),
            Some(user) => {
                warn!(id = %user.id, "stored session is missing name or nickname, discarding");
                store.clear_session()?;
                Ok(Self::anonymous())
            }
            None => Ok(Self::anonymous()),
        }
    }

    pub fn clear<S: DataStore>(&mut self, store: &mut S) -> Result<()> {
        store.clear_session()?;
        self.current = None;
        Ok(())
    }

    /// Rewrites the stored projection after the session user's record changed.
    pub(crate) fn refresh<S: DataStore>(&mut self, store: &mut S, user: &User) -> Result<()> {
        *self = Self::establish(store, user)?;
        Ok(())
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn require(&self) -> Result<&SessionUser> {
        self.current.as_ref().ok_or(ReelzError::NotLoggedIn)
    }
}
