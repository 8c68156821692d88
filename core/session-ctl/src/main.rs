//! session-ctl: command-line front end for the session registry.
//!
//! Used by the spawn/teardown scripts around the tmux control plane. It only
//! records and derives identifiers; creating or killing windows stays with
//! the caller.
//!
//! ## Subcommands
//!
//! - `allocate`: Derive window name, directory and prompt (optionally record it)
//! - `add` / `remove` / `get` / `list`: Direct registry access
//! - `reconcile`: Prune sessions whose window is gone
//! - `sanitize` / `slugify`: Expose the input filters to shell callers
//!
//! ## Reconcile from tmux
//!
//! ```bash
//! tmux list-windows -t main -F '#{window_name}' | session-ctl reconcile --stdin
//! ```

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::CtlResult;
use session_registry::{sanitize, slugify, SessionRequest};

#[derive(Parser)]
#[command(name = "session-ctl")]
#[command(about = "Session registry for ephemeral dev sessions")]
#[command(version)]
struct Cli {
    /// Registry file (default: $SESSION_REGISTRY_HOME/sessions.json or ~/.session-registry/sessions.json)
    #[arg(long, global = true, value_name = "PATH")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive identifiers for a new session and print them as JSON
    Allocate {
        /// Git repository to clone (e.g., github.com/user/repo)
        #[arg(long)]
        repo: Option<String>,

        /// Explicit window name
        #[arg(long)]
        window_name: Option<String>,

        /// Human-readable session name (takes priority for the window name)
        #[arg(long)]
        session_name: Option<String>,

        /// Task for the session
        #[arg(long)]
        instruction: Option<String>,

        /// Also record the session in the registry
        #[arg(long)]
        register: bool,
    },

    /// Record a session (replaces any existing record with the same name)
    Add {
        /// Window name (registry key)
        #[arg(value_name = "NAME")]
        name: String,

        /// Session directory
        #[arg(long)]
        dir: String,

        /// Git repository URL
        #[arg(long)]
        repo: Option<String>,
    },

    /// Forget a session
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print one session as JSON
    Get {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List recorded sessions
    List {
        /// Print the session map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prune sessions whose window is not live; prints pruned names
    Reconcile {
        /// Live window names
        #[arg(value_name = "LIVE")]
        live: Vec<String>,

        /// Also read live window names from stdin, one per line
        #[arg(long)]
        stdin: bool,
    },

    /// Strip characters outside the allowlist
    Sanitize {
        text: String,

        /// Also allow `/` and `@` (repository references)
        #[arg(long)]
        extended: bool,
    },

    /// Print the slug for a session name
    Slugify { text: String },
}

fn main() -> ExitCode {
    // Dropped on return, flushing buffered log lines before the process exits.
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session-ctl failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CtlResult<()> {
    let Cli { registry, command } = cli;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let registry_path = || -> CtlResult<PathBuf> {
        let path = commands::resolve_registry_path(registry.clone())?;
        tracing::debug!(path = %path.display(), "Using session registry");
        Ok(path)
    };

    match command {
        Commands::Allocate {
            repo,
            window_name,
            session_name,
            instruction,
            register,
        } => {
            let request = SessionRequest {
                repo,
                window_name,
                session_name,
                instruction,
            };
            let registry = if register {
                Some(registry_path()?)
            } else {
                None
            };
            commands::allocate(registry.as_deref(), &request, &mut out)
        }
        Commands::Add { name, dir, repo } => {
            commands::add(&registry_path()?, &name, &dir, repo.as_deref(), &mut out)
        }
        Commands::Remove { name } => commands::remove(&registry_path()?, &name, &mut out),
        Commands::Get { name } => commands::get(&registry_path()?, &name, &mut out),
        Commands::List { json } => commands::list(&registry_path()?, json, &mut out),
        Commands::Reconcile { live, stdin } => {
            let path = registry_path()?;
            let stdin_handle = io::stdin();
            let mut stdin_lock = stdin_handle.lock();
            let reader = if stdin {
                Some(&mut stdin_lock as &mut dyn BufRead)
            } else {
                None
            };
            commands::reconcile_live(&path, live, reader, &mut out)
        }
        Commands::Sanitize { text, extended } => {
            writeln!(out, "{}", sanitize(&text, extended))?;
            Ok(())
        }
        Commands::Slugify { text } => {
            writeln!(out, "{}", slugify(&text))?;
            Ok(())
        }
    }
}
