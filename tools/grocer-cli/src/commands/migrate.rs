//! Fold overrides kept in the old three-slot layout into the overlay.

use anyhow::Result;
use grocer_catalog::overlay::{LEGACY_ADDED_KEY, LEGACY_DELETED_KEY, LEGACY_EDITED_KEY};
use grocer_store::KeyValueStore;

use super::{confirm, MigrateArgs};
use crate::context::Context;

/// Run the migrate command.
pub fn run(args: MigrateArgs, ctx: &Context) -> Result<()> {
    let dir = ctx.resolve_path(&ctx.config.store.dir);
    let store = grocer_store::FileStore::open(&dir)?;

    let mut present = Vec::new();
    for key in [LEGACY_ADDED_KEY, LEGACY_DELETED_KEY, LEGACY_EDITED_KEY] {
        if store.exists(key)? {
            present.push(key);
        }
    }
    if present.is_empty() {
        ctx.output.info("No legacy slots found");
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "migrated": false }));
        }
        return Ok(());
    }

    for key in &present {
        ctx.output.list_item(key);
    }
    if !confirm(ctx, args.yes, "Import these slots into the overlay and remove them?")? {
        ctx.output.warn("Migration cancelled");
        return Ok(());
    }

    let catalog = ctx.open_catalog()?;
    let report = catalog.migrate_legacy_slots()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "migrated": true,
            "added": report.added,
            "deleted": report.deleted,
            "edited": report.edited,
            "unreadable": report.unreadable,
            "skippedRecords": report.skipped_records,
        }));
        return Ok(());
    }

    ctx.output.success("Legacy slots imported");
    ctx.output.kv("added", &report.added.to_string());
    ctx.output.kv("deleted", &report.deleted.to_string());
    ctx.output.kv("edited", &report.edited.to_string());
    for key in &report.unreadable {
        ctx.output.warn(&format!(
            "{} was unreadable; treated as empty and left in place",
            key
        ));
    }
    if report.skipped_records > 0 {
        ctx.output
            .warn(&format!("{} record(s) could not be read", report.skipped_records));
    }
    Ok(())
}
