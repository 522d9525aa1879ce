use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use flexform_service::import::ImportOptions;
use flexform_service::FlexFormService;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to the legacy spreadsheet CSV export
    #[arg(short, long)]
    pub file: PathBuf,

    /// Run the whole pipeline but skip the store uploads
    #[arg(long)]
    pub dry_run: bool,

    /// Rows per upload batch (overrides FLEXFORM_BATCH_SIZE)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub async fn execute(
    service: FlexFormService,
    config: Config,
    args: ImportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Starting import: {:?}", args.file);

    // A missing input file or an unreachable store is fatal (exit 1);
    // anything that goes wrong per row is counted and reported instead.
    if !args.file.exists() {
        return Err(format!("Input file not found: {:?}", args.file).into());
    }

    if args.dry_run {
        println!("🧪 Dry run: records will be mapped and classified but not uploaded.");
    } else {
        service
            .store
            .check_connection()
            .await
            .map_err(|err| format!("Store connection failed: {err}"))?;
        println!("✅ Store reachable. Uploading as {}.", config.import_user);
    }

    let options = ImportOptions {
        batch_size: args.batch_size.unwrap_or(config.batch_size),
        dry_run: args.dry_run,
        batch_delay: args.delay_ms.map(Duration::from_millis),
        created_by: config.import_user.clone(),
    };

    let summary = service
        .import_csv(&args.file, &options, |progress| {
            println!(
                "📦 Batch {} done ({} rows read, {} uploaded)",
                progress.batch_index, progress.rows_seen, progress.rows_processed
            );
        })
        .await?;

    println!("🎉 Import complete.");
    println!("   Total rows:       {}", summary.total_records);
    println!("   Processed:        {}", summary.processed_records);
    println!("   Encrypted fields: {}", summary.encrypted_fields);
    println!("   Warnings:         {}", summary.warnings);
    println!("   Errors:           {}", summary.errors);

    if summary.errors > 0 {
        // Partial success still exits 0; the caller decides what a nonzero
        // error count means for them.
        eprintln!("⚠️  {} row(s) failed and were skipped.", summary.errors);
    }

    Ok(())
}
