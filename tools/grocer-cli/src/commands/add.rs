//! Add a product to the overlay.

use anyhow::{Context as _, Result};
use grocer_catalog::prelude::*;

use super::AddArgs;
use crate::context::Context;

/// Run the add command.
pub fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.open_catalog()?;

    let mut draft = ProductDraft::new(args.name, args.price);
    if let Some(id) = args.id {
        draft = draft.with_id(id);
    }
    if let Some(category) = args.category {
        draft = draft.with_category(category);
    }
    draft.image = args.image;
    draft.rating = args.rating;
    draft.discount = args.discount;
    draft.in_stock = !args.out_of_stock;

    let product = catalog
        .add_draft(draft)
        .context("Failed to add product")?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.success(&format!("Added {} ({})", product.name, product.id));
    ctx.output.product_details(&product);
    Ok(())
}
