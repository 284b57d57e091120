//! Edit a product through the overlay.

use anyhow::{bail, Context as _, Result};
use grocer_catalog::prelude::*;

use super::EditArgs;
use crate::context::Context;

/// Run the edit command.
pub fn run(args: EditArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.open_catalog()?;
    let id = ProductId::new(args.id.as_str());

    let current = match catalog.get_product(&id) {
        Some(product) => product,
        None => {
            // Not visible: the edit is kept but shows nowhere until the id appears.
            let (Some(name), Some(price)) = (args.name.clone(), args.price) else {
                bail!(
                    "Product {} is not in the catalog; pass --name and --price to store the edit anyway",
                    id
                );
            };
            ctx.output.warn(&format!(
                "Product {} is not in the catalog; the edit will have no visible effect",
                id
            ));
            Product::new(id.clone(), name, price, catalog.classifier().default_category())
        }
    };

    let updated = apply(current, &args)?;
    let stored = catalog
        .edit_product(updated)
        .context("Failed to edit product")?;

    if ctx.output.is_json() {
        ctx.output.json(&stored);
        return Ok(());
    }

    ctx.output.success(&format!("Updated {} ({})", stored.name, stored.id));
    ctx.output.product_details(&stored);
    Ok(())
}

/// Overwrite the fields given on the command line.
fn apply(mut product: Product, args: &EditArgs) -> Result<Product> {
    if let Some(ref name) = args.name {
        product.name = name.clone();
    }
    if let Some(price) = args.price {
        product.price = price;
    }
    if let Some(ref category) = args.category {
        product.category = category.parse()?;
    }
    if let Some(ref image) = args.image {
        product.image = image.clone();
    }
    if let Some(rating) = args.rating {
        product.rating = rating;
    }
    if let Some(discount) = args.discount {
        product.discount = discount;
    }
    if args.in_stock {
        product.in_stock = true;
    }
    if args.out_of_stock {
        product.in_stock = false;
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: &str) -> EditArgs {
        EditArgs {
            id: id.to_string(),
            name: None,
            price: None,
            category: None,
            image: None,
            rating: None,
            discount: None,
            in_stock: false,
            out_of_stock: false,
        }
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let product = Product::new("1", "Apple", 120.0, CategoryTag::Grocery).with_rating(4.0);
        let mut edit = args("1");
        edit.category = Some("fruits-veggies".to_string());
        edit.out_of_stock = true;

        let updated = apply(product, &edit).unwrap();
        assert_eq!(updated.name, "Apple");
        assert_eq!(updated.price, 120.0);
        assert_eq!(updated.rating, 4.0);
        assert_eq!(updated.category, CategoryTag::FruitsVeggies);
        assert!(!updated.in_stock);
    }

    #[test]
    fn test_apply_rejects_unknown_category() {
        let product = Product::new("1", "Apple", 120.0, CategoryTag::Grocery);
        let mut edit = args("1");
        edit.category = Some("snacks".to_string());
        assert!(apply(product, &edit).is_err());
    }
}
