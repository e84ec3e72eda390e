use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use keepsake_lib::{
    init_logging, AddOutcome, AppConfig, AppError, AppState, CaptureFlow, EntitySchema,
    PresetMedia, Record, RecordId, RecordSynchronizer, DIARY, EMERGENCY,
};

const EXIT_INCOMPLETE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "keepsake", about = "Diary and emergency log records", version)]
struct Cli {
    /// Directory holding the screen databases (overrides KEEPSAKE_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(value_enum)]
    screen: Screen,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Screen {
    Diary,
    Emergency,
}

impl Screen {
    fn schema(self) -> EntitySchema {
        match self {
            Screen::Diary => DIARY,
            Screen::Emergency => EMERGENCY,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List records, newest first.
    List {
        /// Emit the records as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Show a single record.
    Show { id: String },
    /// Save a new record with a photo reference.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Photo reference, e.g. file:///sdcard/DCIM/a.jpg
        #[arg(long)]
        media: String,
    },
    /// Delete every record on the screen.
    Clear,
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            1
        }
    };
    process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    init_logging(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(run_screen(&config, cli.screen.schema(), cli.command))
}

async fn run_screen(config: &AppConfig, schema: EntitySchema, command: Command) -> Result<i32> {
    let state = AppState::open(config).await?;
    let result = match state.screen(&schema) {
        Some(screen) => handle(screen, command).await,
        None => Err(anyhow::anyhow!("unknown screen '{}'", schema.label)),
    };
    state.close().await;
    result
}

async fn handle(screen: &RecordSynchronizer, command: Command) -> Result<i32> {
    match command {
        Command::List { json } => {
            let records = screen.view().await;
            if json {
                let serialized =
                    serde_json::to_string_pretty(&records).map_err(AppError::from)?;
                println!("{serialized}");
            } else if records.is_empty() {
                println!("No {} records.", screen.schema().label);
            } else {
                let now = chrono::Utc::now();
                for record in &records {
                    println!(
                        "{}  {}  ({})",
                        record.id,
                        record.title,
                        record.relative_date(now)
                    );
                }
            }
            Ok(0)
        }
        Command::Show { id } => {
            let id: RecordId = id
                .parse()
                .with_context(|| format!("invalid record id '{id}'"))?;
            match screen.get(id).await {
                Some(record) => {
                    print_record(&record);
                    Ok(0)
                }
                None => {
                    eprintln!("No record with id {id}.");
                    Ok(1)
                }
            }
        }
        Command::Add {
            title,
            description,
            media,
        } => {
            let flow = CaptureFlow::new(PresetMedia::new(media));
            if !flow.begin(screen).await || !flow.choose_image(screen).await.is_selected() {
                return Ok(EXIT_INCOMPLETE);
            }
            screen.set_title(title).await;
            screen.set_description(description).await;
            match screen.save().await.map_err(AppError::from)? {
                AddOutcome::Saved(record) => {
                    println!("Saved {} ({})", record.title, record.id);
                    Ok(0)
                }
                AddOutcome::Incomplete { missing } => {
                    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                    eprintln!("Nothing saved; missing {}.", names.join(", "));
                    Ok(EXIT_INCOMPLETE)
                }
            }
        }
        Command::Clear => {
            let removed = screen.clear_all().await.map_err(AppError::from)?;
            println!("Removed {removed} {} records.", screen.schema().label);
            Ok(0)
        }
    }
}

fn print_record(record: &Record) {
    println!("Id          : {}", record.id);
    println!("Title       : {}", record.title);
    println!("Date        : {}", record.date);
    println!(
        "Created     : {}",
        record.relative_date(chrono::Utc::now())
    );
    println!("Description : {}", record.description);
    println!("Photo       : {}", record.media_uri);
}
