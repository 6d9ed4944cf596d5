use clap::{Parser, Subcommand};
use reelzapp::model::VideoDuration;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

/// Accepts `M:SS` or a plain number of seconds.
pub fn parse_duration_secs(raw: &str) -> Result<f64, String> {
    if raw.contains(':') {
        return raw
            .parse::<VideoDuration>()
            .map(|d| f64::from(d.as_secs()))
            .map_err(|e| e.to_string());
    }
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(format!("Invalid duration: {} (use M:SS or seconds)", raw)),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "reelz",
    bin_name = "reelz",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Local-first short-video sharing from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $REELZ_DATA, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in
    #[command(display_order = 1)]
    Register {
        #[arg(long)]
        name: String,

        /// Lowercased, letters and digits only
        #[arg(long)]
        nickname: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Password confirmation (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Log in with email and password
    #[command(display_order = 2)]
    Login {
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Log out
    #[command(display_order = 3)]
    Logout,

    /// Show the logged-in account
    #[command(display_order = 4)]
    Whoami,

    /// List videos, newest first (the default command)
    #[command(alias = "ls", display_order = 10)]
    Feed {
        /// Only videos whose title, description or owner matches
        query: Option<String>,
    },

    /// Search videos and users
    #[command(display_order = 11)]
    Search { query: String },

    /// Publish a video file
    #[command(display_order = 12)]
    Upload {
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Length as M:SS or seconds
        #[arg(long, value_parser = parse_duration_secs)]
        duration: f64,

        /// Thumbnail image
        #[arg(long)]
        thumbnail: Option<PathBuf>,
    },

    /// Watch a video (counts a view)
    #[command(alias = "v", display_order = 20)]
    Video { id: String },

    /// Toggle your like on a video
    #[command(display_order = 21)]
    Like { id: String },

    /// Comment on a video
    #[command(display_order = 22)]
    Comment {
        id: String,

        /// Comment text (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Show a user's profile
    #[command(display_order = 30)]
    Profile { nickname: String },

    /// Toggle following a user
    #[command(display_order = 31)]
    Follow { nickname: String },

    /// Edit your profile; omitted fields keep their current value
    #[command(display_order = 32)]
    ProfileEdit {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        nickname: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// New avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Check and fix counter inconsistencies
    #[command(display_order = 40)]
    Doctor {
        /// Write the corrected counters
        #[arg(long)]
        fix: bool,
    },

    /// Show, get or set configuration
    #[command(display_order = 41)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate a commented sample reelz.toml
    Gen {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print one configuration value
    Get { key: String },

    /// Persist one configuration value in the data directory
    Set { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn durations_parse_from_clock_or_seconds() {
        assert_eq!(parse_duration_secs("4:59"), Ok(299.0));
        assert_eq!(parse_duration_secs("42"), Ok(42.0));
        assert_eq!(parse_duration_secs("12.5"), Ok(12.5));
        assert!(parse_duration_secs("1:75").is_err());
        assert!(parse_duration_secs("99999999:00").is_err());
        assert!(parse_duration_secs("-3").is_err());
        assert!(parse_duration_secs("abc").is_err());
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["reelz"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn comment_text_is_collected() {
        let cli = Cli::try_parse_from(["reelz", "comment", "123", "nice", "clip"]).unwrap();
        match cli.command {
            Some(Commands::Comment { id, text }) => {
                assert_eq!(id, "123");
                assert_eq!(text.join(" "), "nice clip");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
