//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all reelz operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Resolves the session** once per client invocation ([`ReelzApi::current_session`])
//! - **Carries settings** the commands need (media limits)
//! - **Returns structured types** (`Result<CmdResult>` or a view)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or formatting
//! - **Hidden state**: The session is a value the caller holds and passes back in
//!
//! ## Sessions Are Explicit
//!
//! The caller obtains a [`Session`] from [`ReelzApi::current_session`] and passes it
//! to every operation that needs an actor. Login, registration, logout, follows and
//! profile edits take `&mut Session` because they change who is logged in or what
//! the session projection says.
//!
//! ## Generic Over DataStore
//!
//! `ReelzApi<S: DataStore>` is generic over the storage backend:
//! - Production: `ReelzApi<FileStore>`
//! - Testing: `ReelzApi<InMemoryStore>`

use crate::commands::doctor::DoctorReport;
use crate::commands::profile::{ProfileUpdate, ProfileView};
use crate::commands::register::Registration;
use crate::commands::upload::UploadRequest;
use crate::commands::watch::{VideoView, ViewTracker};
use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::media::MediaLimits;
use crate::model::Video;
use crate::session::Session;
use crate::store::DataStore;

/// The main API facade for reelz operations.
///
/// Generic over `DataStore` to allow different storage backends.
/// All UI clients should interact through this API.
pub struct ReelzApi<S: DataStore> {
    store: S,
    limits: MediaLimits,
}

impl<S: DataStore> ReelzApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limits: MediaLimits::default(),
        }
    }

    pub fn with_media_limits(mut self, limits: MediaLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn media_limits(&self) -> &MediaLimits {
        &self.limits
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves the stored session, discarding an unusable one.
    pub fn current_session(&mut self) -> Result<Session> {
        Session::restore(&mut self.store)
    }

    pub fn register(&mut self, form: Registration, session: &mut Session) -> Result<CmdResult> {
        commands::register::run(&mut self.store, form, session)
    }

    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        session: &mut Session,
    ) -> Result<CmdResult> {
        commands::auth::login(&mut self.store, email, password, session)
    }

    pub fn logout(&mut self, session: &mut Session) -> Result<CmdResult> {
        commands::auth::logout(&mut self.store, session)
    }

    pub fn feed(&self, query: Option<&str>) -> Result<CmdResult> {
        commands::feed::list(&self.store, query)
    }

    pub fn find_video(&self, id: &str) -> Result<Option<Video>> {
        commands::feed::find(&self.store, id)
    }

    pub fn search(&self, query: &str) -> Result<CmdResult> {
        commands::search::run(&self.store, query)
    }

    pub fn upload(&mut self, session: &Session, request: UploadRequest) -> Result<CmdResult> {
        commands::upload::run(&mut self.store, session, request, &self.limits)
    }

    pub fn view_profile(&self, nickname: &str, session: &Session) -> Result<ProfileView> {
        commands::profile::view(&self.store, nickname, session)
    }

    pub fn update_profile(
        &mut self,
        session: &mut Session,
        patch: ProfileUpdate,
    ) -> Result<CmdResult> {
        commands::profile::update(&mut self.store, session, patch)
    }

    pub fn toggle_follow(&mut self, session: &mut Session, nickname: &str) -> Result<CmdResult> {
        commands::follows::toggle(&mut self.store, session, nickname)
    }

    pub fn watch_video(
        &mut self,
        id: &str,
        session: &Session,
        visit: &mut ViewTracker,
    ) -> Result<VideoView> {
        commands::watch::watch(&mut self.store, id, session, visit)
    }

    pub fn record_view(&mut self, id: &str, visit: &mut ViewTracker) -> Result<bool> {
        commands::watch::record_view(&mut self.store, id, visit)
    }

    pub fn toggle_like(&mut self, session: &Session, video_id: &str) -> Result<CmdResult> {
        commands::likes::toggle(&mut self.store, session, video_id)
    }

    pub fn add_comment(
        &mut self,
        session: &Session,
        video_id: &str,
        content: &str,
    ) -> Result<CmdResult> {
        commands::comments::add(&mut self.store, session, video_id, content)
    }

    pub fn doctor(&mut self, fix: bool) -> Result<CmdResult> {
        commands::doctor::run(&mut self.store, fix)
    }

    pub fn doctor_report(&mut self, fix: bool) -> Result<DoctorReport> {
        commands::doctor::check(&mut self.store, fix)
    }
}
