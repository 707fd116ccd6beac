pub mod day;
pub mod history;
pub mod progress;
pub mod quote;

use std::path::PathBuf;

use ansi_term::Colour::Green;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use history::HistoryCommand;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;

use crate::{
    focus::{run_focus_session, FocusSession},
    store::{
        local_store::FileStore,
        routine_store::{RoutineStore, ToggleOutcome},
    },
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
    watch::{shutdown, start_watch},
};

#[derive(Parser, Debug)]
#[command(name = "Routinely", version, long_about = None)]
#[command(about = "Track and check off a fixed daily routine", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display today's schedule with completion marks")]
    Today {
        #[arg(short, long, help = "Only show tasks in this category")]
        category: Option<String>,
    },
    #[command(about = "Toggle completion for a task. Toggling twice undoes the first")]
    Done {
        #[arg(help = "Id of the task, for example 'breakfast'")]
        task_id: String,
    },
    #[command(about = "Clear today's completions. History for other days is kept")]
    Reset {},
    #[command(about = "Display completion progress overall and per category")]
    Progress {},
    #[command(about = "Display completion history for previous days")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },
    #[command(about = "Print the quote of the day")]
    Quote {},
    #[command(about = "Run a focus/break countdown until stopped")]
    Focus {
        #[arg(long, default_value_t = 25, help = "Focus length in minutes")]
        focus: u64,
        #[arg(long = "break", default_value_t = 5, help = "Break length in minutes")]
        break_minutes: u64,
    },
    #[command(about = "Keep running and clear today's completions at local midnight")]
    Watch {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let dir = args.dir.map_or_else(create_application_default_path, Ok)?;
    enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;

    match args.commands {
        Commands::Today { category } => day::process_today_command(dir, category).await,
        Commands::Done { task_id } => process_done_command(dir, &task_id).await,
        Commands::Reset {} => process_reset_command(dir).await,
        Commands::Progress {} => progress::process_progress_command(dir).await,
        Commands::History { command } => history::process_history_command(dir, command).await,
        Commands::Quote {} => quote::process_quote_command(),
        Commands::Focus {
            focus,
            break_minutes,
        } => process_focus_command(focus, break_minutes).await,
        Commands::Watch {} => start_watch(dir).await,
    }
}

pub(crate) async fn open_default_store(dir: PathBuf) -> Result<RoutineStore<FileStore>> {
    Ok(RoutineStore::open(FileStore::new(dir)?, Box::new(DefaultClock)).await)
}

async fn process_done_command(dir: PathBuf, task_id: &str) -> Result<()> {
    let mut store = open_default_store(dir).await?;
    let description = store
        .get_task_by_id(task_id)
        .map(|task| task.description.clone());

    match store.toggle_completion(task_id).await? {
        ToggleOutcome::Completed => println!(
            "{} {}",
            Green.paint("Completed:"),
            description.unwrap_or_else(|| task_id.into())
        ),
        ToggleOutcome::Uncompleted => println!(
            "Marked as not done: {}",
            description.unwrap_or_else(|| task_id.into())
        ),
        ToggleOutcome::UnknownTask => println!(
            "No task named '{task_id}' in the routine. Run 'routinely today' for the list."
        ),
    }
    Ok(())
}

async fn process_reset_command(dir: PathBuf) -> Result<()> {
    let mut store = open_default_store(dir).await?;
    store.reset_today().await?;
    println!("Cleared today's completions. History for other days is kept.");
    Ok(())
}

async fn process_focus_command(focus_minutes: u64, break_minutes: u64) -> Result<()> {
    if focus_minutes == 0 || break_minutes == 0 {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                "Focus and break lengths must be at least a minute",
            )
            .into());
    }

    let shutdown_token = CancellationToken::new();
    let session = FocusSession::new(focus_minutes, break_minutes);

    let (_, focus_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        run_focus_session(session, Box::new(DefaultClock), shutdown_token.clone()),
    );
    focus_result
}
