#![forbid(unsafe_code)]

mod cmd;
mod context;
mod due_input;
mod identity;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use context::Context;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use studycards_core::config::resolve_config;
use studycards_core::error::ErrorCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sc: study cards with due-date triage",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json, FORMAT, and config).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Act as this user (skips env resolution).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Card database path (overrides STUDYCARDS_DB and config).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Cards",
        about = "Create a card",
        long_about = "Create a study card. Without --due it is due immediately.",
        after_help = "EXAMPLES:\n    # Add a backlog card due in three days\n    sc add \"Irregular verbs\" --due +3d\n\n    # Add a card already in progress\n    sc add \"Kanji N5\" --status in_progress --due 2024-06-01\n\n    # Emit machine-readable output\n    sc add \"Irregular verbs\" --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Cards",
        about = "Edit a card",
        long_about = "Change a card's title, notes, status, or due date.",
        after_help = "EXAMPLES:\n    # Rename a card\n    sc edit sc-0a1b2c3d4e --title \"Verbs, past tense\"\n\n    # Move a card back to the backlog\n    sc edit sc-0a1b2c3d4e --status backlog"
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Cards",
        about = "Delete a card",
        long_about = "Remove a card permanently. Prompts on a terminal unless --force is given.",
        after_help = "EXAMPLES:\n    # Delete without a prompt\n    sc delete sc-0a1b2c3d4e --force"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Read",
        about = "List cards",
        long_about = "List your cards with urgency bands. Cards needing attention are marked with '!'.",
        after_help = "EXAMPLES:\n    # Everything\n    sc list\n\n    # Only in-progress cards\n    sc list --status in_progress\n\n    # Board columns\n    sc list --board"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one card",
        long_about = "Show full details for a single card by ID.",
        after_help = "EXAMPLES:\n    # Show a card\n    sc show sc-0a1b2c3d4e\n\n    # The prefix is optional\n    sc show 0a1b2c3d4e"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Cards due soon",
        long_about = "Group upcoming cards into Today, Tomorrow, and Next 7 days, with the due-soon count.",
        after_help = "EXAMPLES:\n    # Grouped view\n    sc due\n\n    # Badge count only\n    sc due --count\n\n    # Flat list of due-soon cards\n    sc due --flat --json"
    )]
    Due(cmd::due::DueArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Start a backlog card",
        long_about = "Move a card from backlog to in progress.",
        after_help = "EXAMPLES:\n    # Start studying a card\n    sc start sc-0a1b2c3d4e"
    )]
    Start(cmd::start::StartArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Complete a card",
        long_about = "Move an open card to done. Prompts on a terminal unless --yes is given.",
        after_help = "EXAMPLES:\n    # Complete a card\n    sc done sc-0a1b2c3d4e --yes"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    sc completions bash\n\n    # Generate zsh completions\n    sc completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("STUDYCARDS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "studycards=debug,sc=debug,info"
        } else {
            "studycards=info,warn"
        })
    });

    let format = env::var("STUDYCARDS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let effective = match resolve_config(cli.config.as_deref(), cli.db.as_deref(), cli.json) {
        Ok(effective) => effective,
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            let mode = cli.format.unwrap_or(if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            });
            render_error(
                mode,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(err);
        }
    };

    let ctx = Context {
        output: resolve_output_mode(cli.format, &effective.resolved_output),
        config: effective.config,
        db_path: effective.db_path,
        user_flag: cli.user.clone(),
    };

    match &cli.command {
        Commands::Add(args) => cmd::add::run_add(args, &ctx),
        Commands::Edit(args) => cmd::edit::run_edit(args, &ctx),
        Commands::Delete(args) => cmd::delete::run_delete(args, &ctx),
        Commands::List(args) => cmd::list::run_list(args, &ctx),
        Commands::Show(args) => cmd::show::run_show(args, &ctx),
        Commands::Due(args) => cmd::due::run_due(args, &ctx),
        Commands::Start(args) => cmd::start::run_start(args, &ctx),
        Commands::Done(args) => cmd::done::run_done(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["sc", "--json", "list"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["sc", "list", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parsed() {
        let cli = Cli::parse_from(["sc", "--format", "pretty", "due"]);
        assert_eq!(cli.format, Some(OutputMode::Pretty));
        assert!(Cli::try_parse_from(["sc", "--format", "yaml", "due"]).is_err());
    }

    #[test]
    fn user_and_db_flags_parsed() {
        let cli = Cli::parse_from(["sc", "--user", "ana", "--db", "/tmp/c.sqlite3", "list"]);
        assert_eq!(cli.user.as_deref(), Some("ana"));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/c.sqlite3")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn user_flag_none_by_default() {
        let cli = Cli::parse_from(["sc", "list"]);
        assert!(cli.user.is_none());
        assert!(cli.format.is_none());
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["sc", "-q", "list"]);
        assert!(cli.quiet);
    }

    #[test]
    fn add_subcommand_parses() {
        let cli = Cli::parse_from(["sc", "add", "Verbs", "--due", "+2d"]);
        assert!(matches!(cli.command, Commands::Add(_)));
    }

    #[test]
    fn lifecycle_subcommands_parse() {
        let cli = Cli::parse_from(["sc", "start", "sc-1"]);
        assert!(matches!(cli.command, Commands::Start(_)));
        let cli = Cli::parse_from(["sc", "done", "sc-1", "--yes"]);
        assert!(matches!(cli.command, Commands::Done(_)));
    }

    #[test]
    fn all_subcommands_listed() {
        let command = Cli::command();
        let names: Vec<_> = command.get_subcommands().map(clap::Command::get_name).collect();
        for expected in [
            "add", "edit", "delete", "list", "show", "due", "start", "done", "completions",
        ] {
            assert!(names.contains(&expected), "missing subcommand {expected}");
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
