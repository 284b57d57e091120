//! Remove products from the visible catalog.

use anyhow::Result;
use grocer_catalog::prelude::*;
use serde::Serialize;

use super::{confirm, DeleteArgs};
use crate::context::Context;

#[derive(Serialize)]
struct Deleted {
    id: ProductId,
    outcome: &'static str,
}

/// Run the delete command.
pub fn run(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let ids: Vec<ProductId> = args.ids.into_iter().map(ProductId::new).collect();

    for id in &ids {
        match catalog.get_product(id) {
            Some(product) => ctx.output.list_item(&format!("{} ({})", product.name, id)),
            None => ctx.output.list_item(&format!("{} (not in catalog)", id)),
        }
    }
    if !confirm(ctx, args.yes, &format!("Delete {} product(s)?", ids.len()))? {
        ctx.output.warn("Delete cancelled");
        return Ok(());
    }

    let mut report = Vec::with_capacity(ids.len());
    for id in ids {
        let outcome = catalog.delete_product(&id)?;
        let label = match outcome {
            DeleteOutcome::RemovedAdded => "removed",
            DeleteOutcome::Tombstoned => "hidden",
            DeleteOutcome::AlreadyDeleted => "already deleted",
        };
        ctx.output.success(&format!("{}: {}", id, label));
        report.push(Deleted { id, outcome: label });
    }

    if ctx.output.is_json() {
        ctx.output.json(&report);
    }
    Ok(())
}
