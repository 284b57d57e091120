//! Drop every local override.

use anyhow::Result;

use super::{confirm, ResetArgs};
use crate::context::Context;

/// Run the reset command.
pub fn run(args: ResetArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let overlay = catalog.overlay();

    if overlay.is_empty() {
        ctx.output.info("Overlay is already empty");
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "reset": false }));
        }
        return Ok(());
    }

    ctx.output.warn(&format!(
        "This discards {} added, {} edited and {} deleted product(s) in namespace '{}'",
        overlay.added.len(),
        overlay.edited.len(),
        overlay.deleted.len(),
        ctx.config.catalog.namespace
    ));
    if !confirm(ctx, args.yes, "Reset the overlay?")? {
        ctx.output.warn("Reset cancelled");
        return Ok(());
    }

    catalog.reset_overlay()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "reset": true }));
    } else {
        ctx.output
            .success(&format!("Catalog back to {} base product(s)", catalog.base().len()));
    }
    Ok(())
}
