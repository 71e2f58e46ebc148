//! Command-line host for the LazyQuest engine.
//!
//! # Responsibility
//! - Wire the engine to SQLite-backed persistence and the system clock.
//! - Run one session per invocation: hydrate, apply one command, flush.
//!
//! All business rules live in `lazyquest_core`; this binary only parses
//! arguments and prints results.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use lazyquest_core::db::open_db;
use lazyquest_core::model::habit::{HabitDraft, TimeOfDay};
use lazyquest_core::model::task::{Priority, TaskDraft};
use lazyquest_core::model::wishlist::WishlistDraft;
use lazyquest_core::{
    init_logging_from_config, EngineConfig, EngineEvent, GameEngine, Redemption,
    SqliteRemoteStore, SqliteSnapshotCache, SystemClock,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "LazyQuest: gamified daily planner", long_about = None)]
struct Cli {
    /// SQLite database file holding remote state and the local cache.
    #[arg(long, global = true, default_value = "lazyquest.db")]
    db: PathBuf,

    /// Account whose state is loaded.
    #[arg(long, short, global = true, default_value = "local")]
    user: String,

    /// JSON engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show balance, rank and today's progress.
    Status,
    /// Add a task; points default to a title-based suggestion.
    AddTask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        points: Option<u64>,
        #[arg(long, default_value = "30m")]
        duration: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// Flip a task's completion.
    ToggleTask { id: String },
    AddHabit {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 10)]
        points: u64,
        #[arg(long, value_enum, default_value_t = SlotArg::Morning)]
        slot: SlotArg,
        #[arg(long)]
        must_do: bool,
    },
    ToggleHabit { id: String },
    /// Move a book's bookmark.
    Read { id: String, page: u32 },
    /// Save a journal entry.
    Journal { text: String },
    AddReward {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: u64,
    },
    /// Spend points on a wishlist item.
    Redeem { id: String },
    /// Print the suggested points for a title.
    Suggest { title: String },
    /// Re-run the day rollover against the current date.
    Refresh,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Self::High,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::Low => Self::Low,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SlotArg {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl From<SlotArg> for TimeOfDay {
    fn from(value: SlotArg) -> Self {
        match value {
            SlotArg::Morning => Self::Morning,
            SlotArg::Afternoon => Self::Afternoon,
            SlotArg::Evening => Self::Evening,
            SlotArg::Night => Self::Night,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if cli.log_dir.is_some() {
        config.logging.log_dir = cli.log_dir.clone();
    }
    init_logging_from_config(&config.logging)?;

    let mut engine = GameEngine::new(
        config,
        Box::new(SystemClock),
        Box::new(SqliteRemoteStore::new(open_db(&cli.db)?)),
        Box::new(SqliteSnapshotCache::new(open_db(&cli.db)?)),
    )?;
    let source = engine.start_session(&cli.user)?;
    info!("event=cli_session module=cli status=ok source={source:?}");

    execute(&mut engine, cli.command)?;

    for event in engine.drain_events() {
        print_event(&event);
    }
    engine.end_session();
    Ok(())
}

fn execute(engine: &mut GameEngine, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Status => print_status(engine),
        Commands::AddTask {
            title,
            points,
            duration,
            date,
            priority,
        } => {
            let points = engine.suggest_points(&title, points);
            let date = date.unwrap_or_else(|| engine.today_overview().date);
            let id = engine.add_task(
                TaskDraft {
                    title,
                    duration,
                    points,
                    date,
                    priority: priority.into(),
                    notes: None,
                },
                None,
            );
            println!("task {id} (+{points})");
        }
        Commands::ToggleTask { id } => {
            let completed = engine.toggle_task(&id)?;
            println!("task {id} completed={completed}");
        }
        Commands::AddHabit {
            title,
            points,
            slot,
            must_do,
        } => {
            let id = engine.add_habit(
                HabitDraft {
                    title,
                    points,
                    slot: slot.into(),
                    reset_time: String::new(),
                    must_do,
                },
                false,
            );
            println!("habit {id}");
        }
        Commands::ToggleHabit { id } => {
            let completed = engine.toggle_habit(&id)?;
            println!("habit {id} completed={completed}");
        }
        Commands::Read { id, page } => {
            let progress = engine.set_book_progress(&id, page)?;
            println!(
                "book {id} page={} progress={}% status={:?}",
                progress.current_page, progress.progress, progress.status
            );
        }
        Commands::Journal { text } => {
            let id = engine.save_journal_entry(&text, false)?;
            println!("journal {id}");
        }
        Commands::AddReward { name, cost } => {
            let id = engine.add_wishlist_item(WishlistDraft {
                name,
                cost,
                image: None,
            });
            println!("reward {id}");
        }
        Commands::Redeem { id } => match engine.redeem(&id)? {
            Redemption::Redeemed { cost } => println!("redeemed {id} for {cost}"),
            Redemption::InsufficientFunds { shortfall } => {
                println!("need {shortfall} more points")
            }
            Redemption::AlreadyRedeemed => println!("already owned"),
        },
        Commands::Suggest { title } => {
            println!("{}", engine.suggest_points(&title, None));
        }
        Commands::Refresh => {
            if let Some(outcome) = engine.refresh_day() {
                println!("rollover: {outcome:?}");
            }
        }
    }
    Ok(())
}

fn print_status(engine: &GameEngine) {
    let ledger = engine.state().ledger();
    let rank = engine.rank();
    let today = engine.today_overview();
    println!("points: {}", ledger.points());
    println!(
        "rank: {} ({}%) level {}",
        rank.name,
        rank.progress_percent(ledger.lifetime_xp()),
        engine.account_level()
    );
    println!("today: {}/{} tasks", today.completed, today.total);
    for task in engine.state().tasks() {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("  [{mark}] {} {} ({})", task.id, task.title, task.points);
    }
    let streak: String = engine
        .journal_week()
        .iter()
        .map(|day| if day.has_entry { '#' } else { '.' })
        .collect();
    println!("journal: {streak}");
}

fn print_event(event: &EngineEvent) {
    match event {
        EngineEvent::LevelUp { rank } => println!("rank up: {rank}"),
        EngineEvent::DayConquered { bonus, .. } => println!("day conquered: +{bonus}"),
        EngineEvent::PenaltyApplied(assessment) if assessment.total > 0 => {
            println!("penalty for {}: -{}", assessment.day, assessment.total)
        }
        EngineEvent::StorageWarning { message } => eprintln!("warning: {message}"),
        _ => {}
    }
}
