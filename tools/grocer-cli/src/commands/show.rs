//! Show one visible product.

use anyhow::{bail, Result};
use grocer_catalog::prelude::*;

use super::ShowArgs;
use crate::context::Context;

/// Run the show command.
pub fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let id = ProductId::new(args.id);

    let Some(product) = catalog.get_product(&id) else {
        bail!("Product {} is not in the catalog", id);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.product_details(&product);

    let overlay = catalog.overlay();
    let origin = if overlay.added_position(&id).is_some() {
        "added locally"
    } else if overlay.edited.contains_key(&id) {
        "edited locally"
    } else {
        "base catalog"
    };
    ctx.output.kv("source", origin);

    Ok(())
}
