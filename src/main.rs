mod error;
mod holidays;
mod http;
mod io;
mod output;
mod roster;
mod run;
mod schedule;
mod web;

use std::path::PathBuf;
use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use holidays::NAGER_BASE_URL;
use output::{render_month, CalendarFile};
use run::{generate, GenerateConfig, HolidaySource};

#[derive(Parser)]
#[command(
    name = "guard-rotation",
    about = "Assigns a two-person on-call guard to every working day of a month",
    version
)]
struct Cli {
    /// Accumulated guard calendar (JSON, one entry per month)
    #[arg(long, global = true, env = "GUARDS_OUTPUT", default_value = "public/guardias.json")]
    output: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the guards of one month (default: next month)
    Generate(GenerateArgs),

    /// Print an already generated month
    Show {
        /// Month to print, as YYYY-MM
        month: String,
    },

    /// Serve the guard calendar over HTTP
    Serve {
        #[arg(long, short, default_value_t = 8080)]
        port: u16,

        /// Static files served at /
        #[arg(long, env = "GUARDS_PUBLIC_DIR", default_value = "public")]
        public_dir: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Roster CSV export: a local path or an http(s) URL
    #[arg(long, env = "GUARDS_SHEET")]
    roster: String,

    /// Fairness history file
    #[arg(long, env = "GUARDS_HISTORY", default_value = "data/historial.json")]
    history: PathBuf,

    /// Target year (requires --month)
    #[arg(long, requires = "month")]
    year: Option<i32>,

    /// Target month, 1-12
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Country code for the public holiday lookup
    #[arg(long, env = "GUARDS_COUNTRY", default_value = "AR")]
    country: String,

    /// Base URL of the public holiday API
    #[arg(long, env = "GUARDS_HOLIDAYS_URL", default_value = NAGER_BASE_URL)]
    holidays_url: String,

    /// Read holidays from a local JSON file instead of the API
    #[arg(long, conflicts_with = "no_holidays")]
    holidays_file: Option<PathBuf>,

    /// Skip the holiday lookup
    #[arg(long)]
    no_holidays: bool,

    /// Print the month without writing the calendar or the history
    #[arg(long)]
    dry_run: bool,
}

impl GenerateArgs {
    fn into_config(self, output: PathBuf) -> GenerateConfig {
        let holidays = if self.no_holidays {
            HolidaySource::None
        } else if let Some(path) = self.holidays_file {
            HolidaySource::File(path)
        } else {
            HolidaySource::Api { base_url: self.holidays_url, country: self.country }
        };

        // A lone --month targets that month of the current year
        let period = self.month.map(|month| {
            let year = self.year.unwrap_or_else(|| Local::now().year());
            (year, month)
        });

        GenerateConfig {
            roster: self.roster,
            holidays,
            history_path: self.history,
            output_path: output,
            period,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr);
    if std::env::var("GUARDS_LOG_JSON").ok().as_deref() == Some("1") {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let config = args.into_config(cli.output);
            let text = generate(&config).await?;
            println!("{}", text);
        }
        Commands::Show { month } => {
            output::parse_month_key(&month)?;
            let calendar = CalendarFile::new(&cli.output)
                .load()
                .with_context(|| format!("reading {}", cli.output.display()))?;
            let days = calendar
                .get(&month)
                .with_context(|| format!("no guards generated for {}", month))?;
            println!("{}", render_month(&month, days));
        }
        Commands::Serve { port, public_dir } => {
            web::start_server(port, CalendarFile::new(cli.output), public_dir).await?;
        }
    }

    Ok(())
}
