use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub supabase_url: String,
    pub service_key: String,
    pub table: String,
    pub passphrase: String,
    pub import_user: String,
    pub batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present

        Ok(Config {
            supabase_url: env::var("SUPABASE_URL")
                .context("SUPABASE_URL must be set")?,

            service_key: env::var("SUPABASE_SERVICE_KEY")
                .context("SUPABASE_SERVICE_KEY must be set")?,

            passphrase: env::var("FLEXFORM_PASSPHRASE")
                .context("FLEXFORM_PASSPHRASE must be set (encrypts contact fields)")?,

            table: env::var("FLEXFORM_TABLE")
                .unwrap_or_else(|_| "form_submissions".to_string()),

            import_user: env::var("FLEXFORM_IMPORT_USER")
                .unwrap_or_else(|_| "import@flexform.local".to_string()),

            batch_size: env::var("FLEXFORM_BATCH_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(100),
        })
    }
}
