use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxboard::cli::selection::MoveTarget;
use fxboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConversionArgs {
    /// Currency the amount is entered in (must be tracked)
    #[arg(short, long)]
    base: Option<String>,

    /// Amount to convert
    #[arg(short, long, allow_hyphen_values = true)]
    amount: Option<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MoveArgs {
    /// Drop onto the slot of this tracked currency
    #[arg(long)]
    to: Option<String>,

    /// Shift by N rows, negative moves up
    #[arg(long, allow_hyphen_values = true)]
    by: Option<isize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch rates once and print the board
    Show(ConversionArgs),
    /// Keep the board on screen and refresh it periodically
    Watch(ConversionArgs),
    /// List tracked currencies in display order
    List,
    /// List every supported currency
    Catalog,
    /// Start tracking a currency
    Add { code: String },
    /// Stop tracking a currency
    Remove { code: String },
    /// Reorder a tracked currency
    Move {
        code: String,
        #[command(flatten)]
        target: MoveArgs,
    },
}

impl From<Commands> for fxboard::AppCommand {
    fn from(cmd: Commands) -> fxboard::AppCommand {
        match cmd {
            Commands::Show(args) => fxboard::AppCommand::Show {
                base: args.base,
                amount: args.amount,
            },
            Commands::Watch(args) => fxboard::AppCommand::Watch {
                base: args.base,
                amount: args.amount,
            },
            Commands::List => fxboard::AppCommand::List,
            Commands::Catalog => fxboard::AppCommand::Catalog,
            Commands::Add { code } => fxboard::AppCommand::Add(code),
            Commands::Remove { code } => fxboard::AppCommand::Remove(code),
            Commands::Move { code, target } => fxboard::AppCommand::Move {
                code,
                target: match (target.to, target.by) {
                    (Some(over), _) => MoveTarget::Onto(over),
                    (None, by) => MoveTarget::By(by.unwrap_or(0)),
                },
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxboard::cli::setup::setup(),
        Some(cmd) => fxboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
