//! Normalize scraped listings into catalog products.

use anyhow::{bail, Context as _, Result};
use grocer_catalog::ingest::SkipReason;
use grocer_catalog::prelude::*;

use super::IngestArgs;
use crate::context::Context;

/// Run the ingest command.
pub fn run(args: IngestArgs, ctx: &Context) -> Result<()> {
    if args.output.is_none() && !args.add {
        ctx.output
            .info("Neither --output nor --add given; only reporting what would be ingested");
    }

    let path = ctx.resolve_path(&args.input);
    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items: Vec<ScrapedItem> = serde_json::from_slice(&content)
        .with_context(|| format!("{} is not a JSON array of scraped records", path.display()))?;

    let classifier = ctx.classifier()?;
    let report = ingest(items, &classifier);
    ctx.output.debug(&format!(
        "{} product(s), {} skipped",
        report.products.len(),
        report.skipped.len()
    ));

    for (index, reason) in &report.skipped {
        let why = match reason {
            SkipReason::EmptyName => "empty name".to_string(),
            SkipReason::BadPrice(price) => format!("unreadable price {}", price),
        };
        ctx.output.warn(&format!("Record {} skipped: {}", index, why));
    }

    if let Some(ref output) = args.output {
        let out_path = ctx.resolve_path(output);
        if out_path == ctx.resolve_path(&ctx.config.catalog.base_path) {
            bail!("Refusing to overwrite the configured base catalog; pick another --output");
        }
        let json = serde_json::to_string_pretty(&report.products)?;
        std::fs::write(&out_path, json)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        ctx.output.success(&format!(
            "Wrote {} product(s) to {}",
            report.products.len(),
            out_path.display()
        ));
    }

    if args.add {
        let catalog = ctx.open_catalog()?;
        for product in &report.products {
            catalog
                .add_product(product.clone())
                .with_context(|| format!("Failed to add {}", product.name))?;
        }
        ctx.output.success(&format!(
            "Added {} product(s) to the overlay",
            report.products.len()
        ));
    }

    let breakdown = report.category_breakdown();
    if ctx.output.is_json() {
        let categories: serde_json::Map<String, serde_json::Value> = breakdown
            .iter()
            .map(|(tag, n)| (tag.as_str().to_string(), (*n).into()))
            .collect();
        ctx.output.json(&serde_json::json!({
            "ingested": report.products.len(),
            "skipped": report.skipped.iter().map(|(i, _)| i).collect::<Vec<_>>(),
            "categories": categories,
        }));
        return Ok(());
    }

    ctx.output.header("Categories");
    for (tag, n) in breakdown {
        ctx.output.kv(tag.display_name(), &n.to_string());
    }
    Ok(())
}
