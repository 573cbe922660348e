//! Legal Calc CLI
//!
//! Command-line front end for the calculation engine:
//! - List the available calculators
//! - Run a single calculator or a batch from JSON
//! - Export a full Price or SAC amortization schedule as CSV
//! - Show the policy tables in force on a date

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

use legal_calc::dispatch::MAX_TERM_MONTHS;
use legal_calc::formulas::{price_schedule, sac_schedule, LoanTerms};
use legal_calc::{CalcError, Calculation, CalculatorKind, Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "legal-calc")]
#[command(about = "Legal and financial calculators for Brazilian practice", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the policy table CSVs
    #[arg(long, global = true)]
    tables_dir: Option<PathBuf>,

    /// Base URL of the index series API
    #[arg(long, global = true)]
    index_url: Option<String>,

    /// Index fetch timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List calculators and their slugs
    List,

    /// Run one calculator on a JSON body
    Calc {
        /// Calculator slug, e.g. `amortizacao`
        slug: String,

        /// JSON file with the request body (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run a JSON array of `{ "calculadora": slug, "dados": {...} }` entries
    Batch {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a full amortization schedule as CSV to stdout
    Schedule {
        #[arg(long)]
        principal: f64,

        /// Monthly rate in percent
        #[arg(long)]
        rate: f64,

        #[arg(long)]
        months: u32,

        #[arg(long, value_enum, default_value_t = Method::Sac)]
        method: Method,
    },

    /// Print the policy tables in force on a date (today when omitted)
    Tables {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Sac,
    Price,
}

#[derive(Deserialize)]
struct BatchEntry {
    calculadora: String,
    #[serde(default)]
    dados: Value,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(dir) = &self.tables_dir {
            config.tables_dir = Some(dir.clone());
        }
        if let Some(url) = &self.index_url {
            config.index_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        config
    }
}

fn read_json(input: Option<&Path>) -> Result<Value> {
    let text = match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("request body is not valid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list() {
    for kind in CalculatorKind::ALL {
        println!("{:<24} {}", kind.slug(), kind.description());
    }
}

fn schedule(principal: f64, rate: f64, months: u32, method: Method) -> Result<()> {
    if months == 0 || months > MAX_TERM_MONTHS {
        bail!("--months must be between 1 and {}", MAX_TERM_MONTHS);
    }
    let terms = LoanTerms::new(principal, rate, months);
    let rows = match method {
        Method::Sac => sac_schedule(&terms),
        Method::Price => price_schedule(&terms),
    };

    let mut writer = csv::Writer::from_writer(io::stdout());
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

async fn calc(config: &EngineConfig, slug: &str, input: Option<&Path>) -> Result<()> {
    let body = read_json(input)?;
    let engine = Engine::from_config(config)?;

    match engine.handle(slug, &body).await {
        Ok(response) => print_json(&response.to_json()?),
        Err(e) => bail!("{} ({})", e.public_message(), e),
    }
}

async fn batch(config: &EngineConfig, input: &Path) -> Result<()> {
    let body = read_json(Some(input))?;
    let entries: Vec<BatchEntry> = serde_json::from_value(body).context("batch input must be an array of entries")?;
    let engine = Engine::from_config(config)?;

    // Entries that fail to parse are reported in place; the rest run together
    let parsed: Vec<_> = entries
        .iter()
        .map(|entry| {
            entry
                .calculadora
                .parse::<CalculatorKind>()
                .and_then(|kind| Calculation::parse(kind, &entry.dados))
        })
        .collect();
    let valid: Vec<Calculation> = parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();

    info!("running batch of {} ({} valid)", entries.len(), valid.len());
    let mut results = engine.calculate_batch(&valid).await.into_iter();

    let mut output = Vec::with_capacity(entries.len());
    for (entry, parsed) in entries.iter().zip(&parsed) {
        let outcome = match parsed {
            Ok(_) => results.next().context("batch result count does not match its input")?,
            Err(e) => {
                output.push(batch_error(&entry.calculadora, e));
                continue;
            }
        };
        output.push(match outcome {
            Ok(response) => json!({ "calculadora": entry.calculadora, "resultado": response.to_json()? }),
            Err(e) => batch_error(&entry.calculadora, &e),
        });
    }

    print_json(&Value::Array(output))
}

fn batch_error(slug: &str, err: &CalcError) -> Value {
    json!({ "calculadora": slug, "erro": err.public_message(), "detalhe": err.to_string() })
}

fn tables(config: &EngineConfig, date: Option<NaiveDate>) -> Result<()> {
    let catalog = config.load_catalog()?;
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let tables = catalog.for_date(date);
    info!("{} table versions loaded, {} in force on {}", catalog.versions().len(), tables.effective_from, date);
    print_json(&serde_json::to_value(tables)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.engine_config();

    match &cli.command {
        Commands::List => list(),
        Commands::Calc { slug, input } => calc(&config, slug, input.as_deref()).await?,
        Commands::Batch { input } => batch(&config, input).await?,
        Commands::Schedule { principal, rate, months, method } => schedule(*principal, *rate, *months, *method)?,
        Commands::Tables { date } => tables(&config, *date)?,
    }

    Ok(())
}
