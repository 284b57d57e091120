//! List the visible catalog.

use anyhow::{anyhow, Result};
use grocer_catalog::prelude::*;

use super::ListArgs;
use crate::context::Context;

/// Run the list command.
pub fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let query = build_query(&args)?;
    let catalog = ctx.open_catalog()?;
    let results = catalog.query(&query);

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!(
        "{} product(s), sorted by {}",
        results.pagination.total,
        query.sort.display_name()
    ));
    if results.items.is_empty() {
        ctx.output.info("No products match");
    } else {
        ctx.output.product_table(&results.items);
    }

    let page = &results.pagination;
    if page.total_pages > 1 {
        ctx.output
            .info(&format!("Page {} of {}", page.page, page.total_pages));
    }

    if args.counts {
        ctx.output.header("Categories");
        for count in &results.category_counts {
            ctx.output
                .kv(count.category.display_name(), &count.count.to_string());
        }
    }

    Ok(())
}

fn build_query(args: &ListArgs) -> Result<CatalogQuery> {
    let sort = SortOption::from_str(&args.sort)
        .ok_or_else(|| anyhow!("Unknown sort option: {}", args.sort))?;

    let mut query = CatalogQuery::new()
        .with_sort(sort)
        .with_pagination(args.page, args.per_page);
    if let Some(ref text) = args.search {
        query = query.with_text(text.as_str());
    }
    if let Some(ref category) = args.category {
        query = query.with_category(category.parse()?);
    }
    if args.in_stock {
        query = query.in_stock_only();
    }
    if let Some(rating) = args.min_rating {
        query = query.with_min_rating(rating);
    }
    Ok(query)
}
