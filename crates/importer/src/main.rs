//! Command-line batch importer.
//!
//! ```text
//! garten-importer varieties Sorte.json
//! garten-importer planting-log Pflanzplan_2025.json
//! ```
//!
//! Reads a JSON array from the given file and imports it into the
//! database at `DATABASE_URL`. A file that is missing or not valid JSON
//! aborts before any record is touched; per-record problems are counted
//! and reported, never fatal.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garten_importer::{import_planting_log, import_varieties};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garten_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (flow, path) = match (args.next(), args.next(), args.next()) {
        (Some(flow), Some(path), None) => (flow, path),
        _ => {
            eprintln!("Usage: garten-importer <varieties|planting-log> <file.json>");
            std::process::exit(2);
        }
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {path}"))?;

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = garten_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    garten_db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let summary = match flow.as_str() {
        "varieties" => {
            let records: Vec<_> = serde_json::from_str(&raw)
                .with_context(|| format!("{path} is not a JSON array of variety records"))?;
            import_varieties(&pool, &records).await
        }
        "planting-log" => {
            let records: Vec<_> = serde_json::from_str(&raw)
                .with_context(|| format!("{path} is not a JSON array of planting-log records"))?;
            import_planting_log(&pool, &records).await
        }
        other => {
            eprintln!("Unknown import flow '{other}'; expected 'varieties' or 'planting-log'");
            std::process::exit(2);
        }
    };

    println!(
        "Done: {} created, {} updated, {} unchanged, {} skipped",
        summary.created, summary.updated, summary.unchanged, summary.skipped
    );
    for reason in &summary.skip_reasons {
        println!("  skipped: {reason}");
    }

    Ok(())
}
