//! # CLI Layer
//!
//! This module is **one possible UI client** for reelz; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data directory, load configuration, build the API
//! 3. **Session Resolution**: Restore the stored session once per invocation
//! 4. **Dispatch**: Route each command to its handler
//! 5. **Output Formatting**: Render results through `render.rs`

use super::render::{
    render_account, render_messages, render_profile, render_progress, render_search,
    render_user_list, render_video_list, render_video_page,
};
use super::setup::{Cli, Commands, ConfigCommands};
use clap::Parser;
use clapfig::{Clapfig, ConfigAction, SearchPath};
use reelzapp::api::ReelzApi;
use reelzapp::commands::profile::{ProfileUpdate, ProfileView};
use reelzapp::commands::register::Registration;
use reelzapp::commands::upload::{UploadProgress, UploadRequest};
use reelzapp::commands::watch::{VideoView, ViewTracker};
use reelzapp::commands::CmdResult;
use reelzapp::config::{ReelzConfig, CONFIG_FILE_NAME};
use reelzapp::error::{ReelzError, Result};
use reelzapp::init::{initialize, resolve_data_dir};
use reelzapp::media::{ImageAsset, MediaAsset};
use reelzapp::session::Session;
use reelzapp::store::fs::FileStore;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Config doesn't need a store or a session
    if let Some(Commands::Config { action }) = &cli.command {
        let data_dir = resolve_data_dir(cli.data.clone())?;
        return handle_config_command(action.as_ref(), &data_dir);
    }

    let ctx = initialize(cli.data.clone())?;
    debug!(data_dir = %ctx.data_dir.display(), "context ready");
    let mut app = AppState {
        api: ctx.api,
        upload_step: ctx.config.upload_step(),
    };
    let mut session = app.api.current_session()?;

    match cli.command {
        None => app.feed(None),
        Some(Commands::Feed { query }) => app.feed(query.as_deref()),
        Some(Commands::Search { query }) => app.search(&query),
        Some(Commands::Register {
            name,
            nickname,
            email,
            password,
            confirm,
        }) => {
            let form = Registration {
                name,
                nickname,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            let result = app.api.register(form, &mut session)?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Login { email, password }) => {
            let result = app.api.login(&email, &password, &mut session)?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Logout) => {
            let result = app.api.logout(&mut session)?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Whoami) => {
            match session.user() {
                Some(user) => print!("{}", render_account(user)),
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Some(Commands::Upload {
            file,
            title,
            description,
            duration,
            thumbnail,
        }) => app.upload(&session, &file, title, description, duration, thumbnail),
        Some(Commands::Video { id }) => app.watch(&id, &session),
        Some(Commands::Like { id }) => {
            let result = app.api.toggle_like(&session, &id)?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Comment { id, text }) => {
            let result = app.api.add_comment(&session, &id, &text.join(" "))?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Profile { nickname }) => app.profile(&nickname, &session),
        Some(Commands::Follow { nickname }) => {
            let result = app.api.toggle_follow(&mut session, &nickname)?;
            print!("{}", render_messages(&result.messages));
            print!("{}", render_user_list(&result.listed_users));
            Ok(())
        }
        Some(Commands::ProfileEdit {
            name,
            nickname,
            email,
            bio,
            avatar,
        }) => {
            let current = session.require()?;
            let mut patch = ProfileUpdate::from_current(current);
            if let Some(name) = name {
                patch.name = name;
            }
            if let Some(nickname) = nickname {
                patch.nickname = nickname;
            }
            if let Some(email) = email {
                patch.email = email;
            }
            if let Some(bio) = bio {
                patch.bio = bio;
            }
            patch.avatar = avatar.as_deref().map(ImageAsset::from_path);
            let result = app.api.update_profile(&mut session, patch)?;
            print_result(&result);
            Ok(())
        }
        Some(Commands::Doctor { fix }) => {
            let result = app.api.doctor(fix)?;
            print!("{}", render_messages(&result.messages));
            Ok(())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Logs go to stderr so they never mix with rendered output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Messages first, then the account (login, register, edits) and any videos
/// that were created or changed.
fn print_result(result: &CmdResult) {
    print!("{}", render_messages(&result.messages));
    if let Some(account) = &result.account {
        print!("{}", render_account(account));
    }
    if !result.affected_videos.is_empty() {
        print!("{}", render_video_list(&result.affected_videos));
    }
}

struct AppState {
    api: ReelzApi<FileStore>,
    upload_step: Duration,
}

impl AppState {
    fn feed(&self, query: Option<&str>) -> Result<()> {
        let result = self.api.feed(query)?;
        print!("{}", render_video_list(&result.listed_videos));
        Ok(())
    }

    fn search(&self, query: &str) -> Result<()> {
        let result = self.api.search(query)?;
        print!("{}", render_messages(&result.messages));
        print!(
            "{}",
            render_search(&result.listed_videos, &result.listed_users)
        );
        Ok(())
    }

    fn upload(
        &mut self,
        session: &Session,
        file: &Path,
        title: String,
        description: String,
        duration_secs: f64,
        thumbnail: Option<PathBuf>,
    ) -> Result<()> {
        let media = MediaAsset::from_file(file, duration_secs)?;
        // Reject a bad file before pretending to transfer it
        media.validate(self.api.media_limits())?;
        session.require()?;

        let request = UploadRequest {
            title,
            description,
            media: Some(media),
            thumbnail: thumbnail.as_deref().map(ImageAsset::from_path),
        };
        self.show_progress();
        let result = self.api.upload(session, request)?;
        print_result(&result);
        Ok(())
    }

    fn show_progress(&self) {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return;
        }
        for percent in UploadProgress::default() {
            let _ = write!(stdout, "{}", render_progress(percent));
            let _ = stdout.flush();
            if !self.upload_step.is_zero() {
                std::thread::sleep(self.upload_step);
            }
        }
        let _ = writeln!(stdout);
    }

    fn watch(&mut self, id: &str, session: &Session) -> Result<()> {
        let mut visit = ViewTracker::new();
        match self.api.watch_video(id, session, &mut visit)? {
            VideoView::Found(page) => print!("{}", render_video_page(&page)),
            VideoView::NotFound { id } => println!("Video not found: {}", id),
        }
        Ok(())
    }

    fn profile(&self, nickname: &str, session: &Session) -> Result<()> {
        match self.api.view_profile(nickname, session)? {
            ProfileView::Found(page) => print!("{}", render_profile(&page)),
            ProfileView::NotFound { nickname } => println!("User not found: @{}", nickname),
        }
        Ok(())
    }
}

/// Handle the `reelz config` subcommand using clapfig directly.
fn handle_config_command(action: Option<&ConfigCommands>, data_dir: &Path) -> Result<()> {
    let search_paths = vec![SearchPath::Path(data_dir.to_path_buf())];
    let builder = || {
        Clapfig::builder::<ReelzConfig>()
            .app_name("reelz")
            .file_name(CONFIG_FILE_NAME)
            .search_paths(search_paths.clone())
            .no_env()
            .strict(false)
    };

    match action {
        None => {
            // Bare `reelz config`: show all resolved values
            let config = builder().load().unwrap_or_default();
            let table =
                toml::Value::try_from(&config).map_err(|e| ReelzError::Config(e.to_string()))?;
            if let toml::Value::Table(t) = table {
                for (k, v) in &t {
                    println!("{} = {}", k, format_toml_value(v));
                }
            }
            Ok(())
        }
        Some(ConfigCommands::Gen { output }) => {
            let action = ConfigAction::Gen {
                output: output.clone(),
            };
            let result = builder().handle(&action)
                .map_err(|e| ReelzError::Config(e.to_string()))?;
            print!("{result}");
            Ok(())
        }
        Some(ConfigCommands::Get { key }) => {
            let action = ConfigAction::Get { key: key.clone(), scope: None };
            let result = builder().handle(&action)
                .map_err(|e| ReelzError::Config(e.to_string()))?;
            println!("{result}");
            Ok(())
        }
        Some(ConfigCommands::Set { key, value }) => {
            std::fs::create_dir_all(data_dir)?;
            let action = ConfigAction::Set {
                key: key.clone(),
                value: value.clone(),
                scope: None,
            };
            let result = builder().handle(&action)
                .map_err(|e| ReelzError::Config(e.to_string()))?;
            println!("{result}");
            Ok(())
        }
    }
}

/// Format a TOML value for display.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("\"{}\"", s),
        toml::Value::Array(a) => toml::to_string(a).unwrap_or_else(|_| format!("{a:?}")),
        other => other.to_string(),
    }
}
