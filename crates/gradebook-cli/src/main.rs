//! gradebook CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use gradebook_core::model::Grade;
use gradebook_core::view::SortKey;

mod commands;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Student roster manager")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the roster
    List {
        /// Case-insensitive match on name or student id
        #[arg(long)]
        search: Option<String>,

        /// Only show this grade (A, B, C, D, F)
        #[arg(long)]
        grade: Option<Grade>,

        /// Sort by: name, total, average, grade, studentId, unsorted
        #[arg(long, value_parser = sort_key)]
        sort: Option<SortKey>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show roster statistics and the grade chart
    Stats {
        /// Case-insensitive match on name or student id
        #[arg(long)]
        search: Option<String>,

        /// Only count this grade
        #[arg(long)]
        grade: Option<Grade>,
    },

    /// Preview a student's total, average and grade without saving
    Grade {
        /// Student name
        name: String,

        /// Five marks between 0 and 100
        #[arg(num_args = 5, required = true, allow_hyphen_values = true)]
        marks: Vec<String>,
    },

    /// Add a student
    Add {
        /// Student name
        name: String,

        /// Five marks between 0 and 100
        #[arg(num_args = 5, required = true, allow_hyphen_values = true)]
        marks: Vec<String>,
    },

    /// Replace a student's name and marks
    Edit {
        /// Student id
        id: String,

        /// New name
        name: String,

        /// Five marks between 0 and 100
        #[arg(num_args = 5, required = true, allow_hyphen_values = true)]
        marks: Vec<String>,
    },

    /// Delete a student
    Delete {
        /// Student id
        id: String,
    },

    /// Delete several students, one at a time
    BulkDelete {
        /// Student ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every student
    Clear {
        /// Confirm deleting all students
        #[arg(long)]
        yes: bool,
    },

    /// Export the roster as CSV
    Export {
        /// Output file (default: students_<date>.csv in the export directory)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Case-insensitive match on name or student id
        #[arg(long)]
        search: Option<String>,

        /// Only export this grade
        #[arg(long)]
        grade: Option<Grade>,

        /// Sort by: name, total, average, grade, studentId, unsorted
        #[arg(long, value_parser = sort_key)]
        sort: Option<SortKey>,
    },

    /// Import students from a CSV file
    Import {
        /// CSV file in the export format
        #[arg(long)]
        file: PathBuf,
    },

    /// Create a starter config file
    Init,
}

/// Unknown sort keys leave the roster unsorted, same as in config.
fn sort_key(raw: &str) -> Result<SortKey, String> {
    Ok(SortKey::from_key(raw))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::List {
            search,
            grade,
            sort,
            json,
        } => commands::list::execute(config, search, grade, sort, json).await,
        Commands::Stats { search, grade } => {
            commands::stats::execute(config, search, grade).await
        }
        Commands::Grade { name, marks } => commands::grade::execute(name, marks),
        Commands::Add { name, marks } => commands::add::execute(config, name, marks).await,
        Commands::Edit { id, name, marks } => {
            commands::edit::execute(config, id, name, marks).await
        }
        Commands::Delete { id } => commands::delete::execute(config, id).await,
        Commands::BulkDelete { ids } => commands::delete::execute_bulk(config, ids).await,
        Commands::Clear { yes } => commands::clear::execute(config, yes).await,
        Commands::Export {
            output,
            search,
            grade,
            sort,
        } => commands::export::execute(config, output, search, grade, sort).await,
        Commands::Import { file } => commands::import::execute(config, file).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
