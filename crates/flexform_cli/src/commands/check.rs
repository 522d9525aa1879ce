use clap::Args;

use flexform_service::FlexFormService;
use flexform_store::Filter;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Restrict the count to one department
    #[arg(long)]
    pub department: Option<String>,
}

pub async fn execute(
    service: FlexFormService,
    args: CheckArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔌 Probing submission store...");

    service
        .store
        .check_connection()
        .await
        .map_err(|err| format!("Store connection failed: {err}"))?;

    let mut filter = Filter::new();
    if let Some(department) = &args.department {
        filter = filter.eq("department", department);
    }
    let total = service.store.count(&filter).await?;

    println!("✅ Store reachable. {} submission(s) on record.", total);
    Ok(())
}
