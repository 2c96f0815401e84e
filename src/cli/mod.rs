pub mod input;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use input::{DateStyle, parse_optional_time_arg};
use now::DateTimeNow;
use output::{print_range, print_task};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    query::{RangeConfig, tasks_between},
    storage::{
        entities::TaskDraft,
        task_store::{DailyLogMode, StoreConfig, TaskStorage, TaskStore},
    },
    utils::{
        clock::{Clock, DefaultClock, FixedClock},
        dir::{application_default_path, ensure_dir_all},
        logging::{CLI_PREFIX, enable_logging},
    },
};

#[derive(Parser, Debug)]
#[command(name = "ttracker", version, long_about = None)]
#[command(about = "Keeps track of what you are working on and for how long", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        env = "TTRACKER_DIR",
        help = "Directory tasks are stored in. By default ~/.ttimetracker"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "overwrite",
        env = "TTRACKER_LOG_MODE",
        help = "How finished tasks are written into the daily log. Overwrite replaces the whole day"
    )]
    log_mode: DailyLogMode,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "uk",
        help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year"
    )]
    date_style: DateStyle,
    #[arg(long, global = true, help = "Print tasks as json")]
    json: bool,
    #[arg(long, global = true, help = "Show logs in the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level, RUST_LOG is used otherwise")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Start a task. A task that is already running gets finished when the new one starts"
    )]
    Start {
        #[arg(required = true, trailing_var_arg = true, help = "What you are doing")]
        description: Vec<String>,
        #[arg(
            long,
            short,
            help = "When the task started. Examples are \"14:32\", \"2012-05-16 14:32\", \"1 hour ago\""
        )]
        at: Option<String>,
        #[arg(
            long,
            short,
            help = "When the task finished. The task is logged right away instead of running"
        )]
        to: Option<String>,
    },
    #[command(about = "Finish the running task")]
    Finish {
        #[arg(long, short, help = "When the task finished. Now by default")]
        at: Option<String>,
    },
    #[command(about = "Drop the running task without logging it")]
    Cancel {},
    #[command(about = "Show the running task")]
    Current {},
    #[command(about = "Show the task finished most recently")]
    Last {},
    #[command(about = "Show logged tasks. Only today by default")]
    List {
        #[arg(long, short, help = "Start of the range. Examples are \"yesterday\", \"15/03/2025\"")]
        from: Option<String>,
        #[arg(long, short, help = "End of the range. Examples are \"today\", \"15/03/2025\"")]
        to: Option<String>,
        #[arg(long, short, conflicts_with_all = ["from", "to"], help = "Show the current week")]
        week: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let root = args.dir.clone().map_or_else(application_default_path, Ok)?;
    ensure_dir_all(&root)?;

    let logging_level = if args.log {
        Some(args.log_filter.unwrap_or(LevelFilter::TRACE))
    } else {
        args.log_filter
    };
    enable_logging(CLI_PREFIX, &root.join("logs"), logging_level, args.log)?;

    let clock = FixedClock(DefaultClock.time());
    let config = StoreConfig::new(root).with_log_mode(args.log_mode);
    let store = TaskStore::new(config, clock.wall_time())?;
    info!("Running {:?} at {}", args.commands, clock.time());

    process_command(&store, args, clock.time()).await
}

async fn process_command(store: &TaskStore, args: Args, now: DateTime<Local>) -> Result<()> {
    let Args {
        commands,
        date_style,
        json,
        ..
    } = args;
    let reference = store.now();

    match commands {
        Commands::Start {
            description,
            at,
            to,
        } => {
            let start = parse_optional_time_arg("--at", at.as_deref(), now, date_style)?;
            let finish = parse_optional_time_arg("--to", to.as_deref(), now, date_style)?;

            let (previous, record) = store
                .switch_task(
                    TaskDraft::new(description.join(" "))
                        .starting_at(start)
                        .finishing_at(finish),
                )
                .await?;
            if let Some(previous) = previous {
                println!("Finished");
                print_task(&previous, reference, false, json)?;
            }
            let running = record.is_running();
            println!("{}", if running { "Started" } else { "Logged" });
            print_task(&record, reference, running, json)
        }
        Commands::Finish { at } => {
            let at = parse_optional_time_arg("--at", at.as_deref(), now, date_style)?;
            match store.finish_current(at).await? {
                Some(record) => print_task(&record, reference, false, json),
                None => {
                    println!("No task is running");
                    Ok(())
                }
            }
        }
        Commands::Cancel {} => match store.cancel_current().await? {
            Some(record) => {
                println!("Cancelled");
                print_task(&record, reference, true, json)
            }
            None => {
                println!("No task is running");
                Ok(())
            }
        },
        Commands::Current {} => match store.current_task().await? {
            Some(record) => print_task(&record, reference, true, json),
            None => {
                println!("No task is running");
                Ok(())
            }
        },
        Commands::Last {} => match store.last_task().await? {
            Some(record) => print_task(&record, reference, false, json),
            None => {
                println!("No task was finished since the current one started");
                Ok(())
            }
        },
        Commands::List { from, to, week } => {
            let config = if week {
                RangeConfig::new(
                    Some(now.beginning_of_week().naive_local()),
                    Some(now.end_of_week().naive_local()),
                )
            } else {
                RangeConfig::new(
                    parse_optional_time_arg("--from", from.as_deref(), now, date_style)?,
                    parse_optional_time_arg("--to", to.as_deref(), now, date_style)?,
                )
            };
            let range = tasks_between(store, config).await?;
            print_range(&range, json)
        }
    }
}
