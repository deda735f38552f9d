mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cfpath::diagnostics;
use cfpath::error::Error;

use crate::commands::Session;

#[derive(Parser)]
#[command(
    name = "cfpath",
    version,
    about = "Resolve CFML dotted component paths and document links"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// User-level config supplying fallback mappings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Project root; repeat for several. Defaults to the current directory.
    #[arg(long = "root", global = true)]
    roots: Vec<PathBuf>,
    /// Log every resolution step to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dotted component name (a.b.User) to its .cfc file
    Component {
        /// Dotted component name.
        name: String,
        /// Document the reference appears in.
        #[arg(long)]
        from: PathBuf,
    },
    /// Scan documents for links and print those that resolve
    Links {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List sub-directories and component files of a directory
    Ls {
        /// Directory to list.
        dir: PathBuf,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Manage logical mappings in .cfpath.toml
    Mappings {
        #[command(subcommand)]
        action: MappingAction,
    },
    /// Resolve a dotted path relative to a document
    Resolve {
        /// Dotted path such as `models.user`.
        dotted: String,
        /// Document the reference appears in.
        #[arg(long)]
        from: PathBuf,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// Add a logical mapping
    Add {
        /// Slash-prefixed logical path, e.g. /models.
        logical_path: String,
        /// Directory the logical path maps to.
        directory_path: String,
        /// Treat the directory as relative to the project root.
        #[arg(long)]
        root_relative: bool,
    },
    /// List mappings that apply in the first root
    List,
    /// Remove a logical mapping
    Remove {
        /// Logical path of the mapping to remove.
        logical_path: String,
    },
}

/// Install the stderr log subscriber. Warnings only unless `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    return;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    return match run(cli) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns whatever the selected command returns.
fn run(cli: Cli) -> Result<ExitCode, Error> {
    let roots = if cli.roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.roots
    };

    let session = Session::load(&roots, cli.config.as_deref())?;
    return match cli.command {
        Commands::Component { name, from } => commands::component(&session, &name, &from),
        Commands::Links { paths, json } => commands::links(&session, &paths, json),
        Commands::Ls { dir, json } => commands::ls(&dir, json),
        Commands::Mappings { action } => match action {
            MappingAction::Add {
                logical_path,
                directory_path,
                root_relative,
            } => commands::mappings_add(&session, &logical_path, &directory_path, root_relative),
            MappingAction::List => Ok(commands::mappings_list(&session)),
            MappingAction::Remove { logical_path } => {
                commands::mappings_remove(&session, &logical_path)
            },
        },
        Commands::Resolve { dotted, from } => commands::resolve(&session, &dotted, &from),
    };
}
