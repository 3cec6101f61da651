//! Filmdash CLI - film catalogue aggregates
//!
//! # Main Commands
//!
//! ```bash
//! filmdash serve --data films.csv                         # Start HTTP server (port 3000)
//! filmdash count films.csv --field language               # Films per language
//! filmdash stats films.csv --genre Documentary --language english
//! filmdash top films.csv --genre Documentary --language english -n 5
//! filmdash languages-by-year films.csv --year 2020
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! filmdash parse films.csv         # Just parse CSV to JSON
//! ```

use clap::{Parser, Subcommand};
use filmdash::{
    query, parse_csv_file_auto, CategoryField, DashboardConfig, Dataset, SplitPolicy,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "filmdash")]
#[command(version, about = "Genre, language and rating aggregates over a film catalogue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count films per genre or language token
    Count {
        /// Input CSV file
        input: PathBuf,

        /// Field to tally: genre or language
        #[arg(short, long, default_value = "language")]
        field: CategoryField,

        /// Count empty tokens between consecutive '/' separators
        #[arg(long)]
        keep_empty: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Film count and mean IMDB score for a genre and language
    Stats {
        /// Input CSV file
        input: PathBuf,

        /// Exact genre
        #[arg(short, long)]
        genre: String,

        /// Language substring, case-insensitive
        #[arg(short, long)]
        language: String,
    },

    /// Films matching a genre and language, in file order
    Films {
        /// Input CSV file
        input: PathBuf,

        /// Exact genre
        #[arg(short, long)]
        genre: String,

        /// Language substring, case-insensitive
        #[arg(short, long)]
        language: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Highest-rated films for a genre and language
    Top {
        /// Input CSV file
        input: PathBuf,

        /// Exact genre
        #[arg(short, long)]
        genre: String,

        /// Language substring, case-insensitive
        #[arg(short, long)]
        language: String,

        /// Number of films (default: 10)
        #[arg(short, default_value_t = query::DEFAULT_TOP_N)]
        n: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List distinct premiere years
    Years {
        /// Input CSV file
        input: PathBuf,
    },

    /// Language distribution for one premiere year
    LanguagesByYear {
        /// Input CSV file
        input: PathBuf,

        /// Premiere year
        #[arg(short, long)]
        year: i32,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Catalogue CSV (default: $FILMDASH_DATA)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Port to listen on (default: $FILMDASH_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Count {
            input,
            field,
            keep_empty,
            output,
        } => cmd_count(&input, field, keep_empty, output.as_deref()),

        Commands::Stats {
            input,
            genre,
            language,
        } => cmd_stats(&input, &genre, &language),

        Commands::Films {
            input,
            genre,
            language,
            output,
        } => cmd_films(&input, &genre, &language, output.as_deref()),

        Commands::Top {
            input,
            genre,
            language,
            n,
            output,
        } => cmd_top(&input, &genre, &language, n, output.as_deref()),

        Commands::Years { input } => cmd_years(&input),

        Commands::LanguagesByYear {
            input,
            year,
            output,
        } => cmd_languages_by_year(&input, year, output.as_deref()),

        Commands::Serve { data, port } => cmd_serve(data, port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> CliResult {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} rows", result.rows.len());

    write_json(&result.to_json(), output)
}

fn cmd_count(input: &Path, field: CategoryField, keep_empty: bool, output: Option<&Path>) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let policy = if keep_empty {
        SplitPolicy::KeepEmpty
    } else {
        SplitPolicy::DropEmpty
    };

    let table = query::count_with(dataset.films(), field, policy);
    eprintln!("📊 {} distinct {} value(s), {} total", table.len(), field, table.total());

    write_json(&table, output)
}

fn cmd_stats(input: &Path, genre: &str, language: &str) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let stats = query::stats(&dataset, genre, language)?;

    match stats.mean_score {
        Some(mean) => eprintln!(
            "📊 {} film(s) in '{}' matching '{}', mean IMDB score {:.2}",
            stats.count, genre, language, mean
        ),
        None => eprintln!("📊 No film in '{}' matching '{}'", genre, language),
    }

    write_json(&stats, None)
}

fn cmd_films(input: &Path, genre: &str, language: &str, output: Option<&Path>) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let films = query::matching_films(&dataset, genre, language)?;
    eprintln!("🎬 {} matching film(s)", films.len());

    write_json(&films, output)
}

fn cmd_top(input: &Path, genre: &str, language: &str, n: usize, output: Option<&Path>) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let films = query::top_films_n(&dataset, genre, language, n)?;

    eprintln!("🏆 Top {} of '{}' in '{}':", films.len(), genre, language);
    for (i, film) in films.iter().enumerate() {
        eprintln!(
            "   {:2}. {} ({})",
            i + 1,
            film.title,
            film.imdb_score.map(|s| format!("{:.1}", s)).unwrap_or_default()
        );
    }

    write_json(&films, output)
}

fn cmd_years(input: &Path) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let years = query::premiere_years(&dataset);
    eprintln!("📅 {} distinct premiere year(s)", years.len());

    write_json(&years, None)
}

fn cmd_languages_by_year(input: &Path, year: i32, output: Option<&Path>) -> CliResult {
    let dataset = Dataset::from_path(input)?;
    let table = query::language_distribution(&dataset, year);

    if table.is_empty() {
        eprintln!("📭 No data available for {}", year);
    } else {
        eprintln!("🌍 Language distribution in {}:", year);
        for share in table.shares() {
            eprintln!("   {:<20} {:>4}  {:5.1}%", share.token, share.count, share.fraction * 100.0);
        }
    }

    write_json(&table, output)
}

async fn cmd_serve(data: Option<PathBuf>, port: Option<u16>) -> CliResult {
    let config = DashboardConfig::from_env().with_overrides(data, port);
    filmdash::server::start_server(config).await?;
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> CliResult {
    let content = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
