use std::fs;
use std::path::PathBuf;

use clap::Args;

use flexform_core::form;
use flexform_core::models::FormSchema;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the form schema JSON file to validate
    #[arg(short, long)]
    pub file: PathBuf,
}

pub async fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating schema: {:?}", args.file);

    // 1. Load File
    let raw = fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read file: {}", e))?;

    // 2. Parse (Structural Check)
    let schema: FormSchema = match serde_json::from_str(&raw) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("❌ FATAL: Schema Structure Violation");
            eprintln!("The file is not a well-formed FLEX-FORM template.");
            eprintln!("Error: {}", e);
            return Ok(()); // Exit gracefully with error printed
        }
    };

    // 3. Run the semantic checks
    if let Err(err) = schema.check_unique_names() {
        println!("⚠️  VALIDATION FAILED");
        println!("   {}", err);
        return Ok(());
    }

    // 4. Prove the template renders
    let rendered = form::render(&schema);

    println!("🎉 VALIDATION PASSED!");
    println!(
        "Template '{}' renders {} input(s) and is ready for the portal.",
        schema.name,
        rendered.inputs().len()
    );
    for input in rendered.inputs() {
        let marker = if input.required { "*" } else { " " };
        println!("  {} {} [{:?}]", marker, input.name, input.control);
    }

    Ok(())
}
