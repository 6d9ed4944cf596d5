//! # Reelz CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/reelzapp/`: Core library with UI-agnostic logic and storage
//! - `crates/reelz/`: This CLI tool, depends on `reelzapp`
//!
//! ## Routes as Commands
//!
//! Each page of a browser client maps onto a subcommand:
//!
//! ```text
//! /auth                 register, login, logout, whoami
//! /                     feed [QUERY]   (default)
//! /search               search QUERY
//! /upload               upload FILE --title --description --duration
//! /profile/{nickname}   profile NICK, follow NICK
//! /profile/edit         profile-edit
//! /video/{id}           video ID, like ID, comment ID TEXT
//! ```
//!
//! Each invocation is one "page visit": the session is resolved once, the view
//! tracker lives for the duration of the process, and output is rendered from
//! the structured results the API returns.
//!
//! ## Testing Approach
//!
//! - **Commands layer (`reelzapp::commands`)**: heavy unit testing of the logic.
//! - **Rendering (`src/cli/render.rs`)**: string-returning renderers tested with
//!   canned data.
//! - **End to end (`tests/`)**: the real binary against a temporary data
//!   directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
