use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use pd_core::{
    execute, CoreConfig, PatientRecord, QueryRequest, RecordSource, DEFAULT_PATIENT_DATA_FILE,
};

#[derive(Parser)]
#[command(name = "pd")]
#[command(about = "Patient directory CLI")]
struct Cli {
    /// Path to the patient dataset (falls back to PATIENT_DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Query the directory with search, filters, sorting, and paging
    Query {
        /// Case-insensitive search text
        #[arg(long)]
        search: Option<String>,
        /// Medical issue labels (comma-separated)
        #[arg(long)]
        issue: Option<String>,
        /// Sort field: patient_name | age | patient_id | medical_issue
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort order: asc | desc
        #[arg(long)]
        sort_order: Option<String>,
        /// Page number (minimum 1)
        #[arg(long)]
        page: Option<String>,
        /// Page size (1-100)
        #[arg(long)]
        limit: Option<String>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_file = cli
        .data_file
        .or_else(|| std::env::var("PATIENT_DATA_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATIENT_DATA_FILE));
    let cfg = Arc::new(CoreConfig::new(data_file)?);
    let source = RecordSource::new(cfg);

    match cli.command {
        Some(Commands::List) => {
            let records = source.snapshot()?;
            if records.is_empty() {
                println!("No patients found.");
            } else {
                for record in &records {
                    print_record(record);
                }
            }
        }
        Some(Commands::Query {
            search,
            issue,
            sort_by,
            sort_order,
            page,
            limit,
            json,
        }) => {
            // Reuse the endpoint's coercion rules so CLI and API agree on
            // defaults and clamping.
            let mut params = HashMap::new();
            insert_param(&mut params, "search", search);
            insert_param(&mut params, "medicalIssue", issue);
            insert_param(&mut params, "sortBy", sort_by);
            insert_param(&mut params, "sortOrder", sort_order);
            insert_param(&mut params, "page", page);
            insert_param(&mut params, "limit", limit);
            let request = QueryRequest::from_params(&params);

            let records = source.snapshot()?;
            let result = execute(records, &request);

            if json {
                println!("{}", serde_json::to_string_pretty(&result.items)?);
            } else if result.items.is_empty() {
                println!("No patients matched.");
            } else {
                for record in &result.items {
                    print_record(record);
                }
            }

            let p = &result.pagination;
            println!(
                "Page {} of {} ({} matching patients)",
                p.current_page, p.total_pages, p.total_items
            );
        }
        None => {
            println!("pd: patient directory CLI (try --help)");
        }
    }

    Ok(())
}

fn insert_param(params: &mut HashMap<String, String>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        params.insert(key.to_string(), value);
    }
}

fn print_record(record: &PatientRecord) {
    println!(
        "ID: {}, Name: {}, Age: {}, Issue: {}",
        record.id, record.name, record.age, record.medical_issue
    );
}
