use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

use flexform_service::export::{export_records, ExportFormat, ExportRow};
use flexform_service::FlexFormService;
use flexform_store::Filter;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Target format: csv, excel or pdf
    #[arg(short = 'F', long)]
    pub format: ExportFormatArg,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Only records from this department
    #[arg(long)]
    pub department: Option<String>,

    /// Only records created at or after this RFC 3339 timestamp
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Only records created at or before this RFC 3339 timestamp
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,

    /// Hard cap on the number of records fetched
    #[arg(long)]
    pub limit: Option<u32>,

    /// Name recorded on the export's metadata sheet
    #[arg(long, default_value = "flexform_forge")]
    pub exported_by: String,
}

/// clap-friendly wrapper so `--format csv|excel|pdf` parses directly.
#[derive(Debug, Clone)]
pub struct ExportFormatArg(pub ExportFormat);

impl std::str::FromStr for ExportFormatArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .parse::<ExportFormat>()
            .map(ExportFormatArg)
            .map_err(|err| err.to_string())
    }
}

pub async fn execute(
    service: FlexFormService,
    _config: Config,
    args: ExportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("📦 Fetching submissions for export...");

    let mut filter = Filter::new();
    if let Some(department) = &args.department {
        filter = filter.eq("department", department);
    }
    if let Some(since) = args.since {
        filter = filter.since(since);
    }
    if let Some(until) = args.until {
        filter = filter.until(until);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }

    let records = service.store.select_all(&filter).await?;
    println!("✅ {} record(s) fetched.", records.len());

    // Flatten into the row shape the renderer consumes.
    let mut rows: Vec<ExportRow> = Vec::with_capacity(records.len());
    for record in &records {
        if let serde_json::Value::Object(map) = serde_json::to_value(record)? {
            rows.push(map);
        }
    }

    let bytes = export_records(&rows, args.format.0, &args.exported_by)?;
    fs::write(&args.output, &bytes)?;

    println!(
        "🎉 Export complete: {} bytes written to {:?}",
        bytes.len(),
        args.output
    );
    Ok(())
}
