//! Catalog query builder.

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryTag, Product};
use crate::search::{CategoryCount, Pagination, QueryResults};

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Reconciled catalog order.
    #[default]
    Featured,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by highest rated.
    Rating,
    /// Sort by largest discount.
    Discount,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::NameAsc => "name-asc",
            SortOption::Rating => "rating",
            SortOption::Discount => "discount",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "featured" => Some(SortOption::Featured),
            "price-asc" => Some(SortOption::PriceAsc),
            "price-desc" => Some(SortOption::PriceDesc),
            "name-asc" | "name" => Some(SortOption::NameAsc),
            "rating" => Some(SortOption::Rating),
            "discount" => Some(SortOption::Discount),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::Rating => "Highest Rated",
            SortOption::Discount => "Biggest Discount",
        }
    }

    /// Stable sort; ties keep catalog order.
    fn sort(&self, products: &mut [Product]) {
        match self {
            SortOption::Featured => {}
            SortOption::PriceAsc => {
                products.sort_by(|a, b| a.discounted_price().total_cmp(&b.discounted_price()))
            }
            SortOption::PriceDesc => {
                products.sort_by(|a, b| b.discounted_price().total_cmp(&a.discounted_price()))
            }
            SortOption::NameAsc => {
                products.sort_by_cached_key(|p| p.name.to_lowercase())
            }
            SortOption::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOption::Discount => products.sort_by(|a, b| b.discount.cmp(&a.discount)),
        }
    }
}

/// A listing query over the reconciled catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the product name.
    pub text: Option<String>,
    /// Restrict to one category.
    pub category: Option<CategoryTag>,
    /// Hide out-of-stock products.
    pub in_stock_only: bool,
    /// Minimum rating, inclusive.
    pub min_rating: Option<f64>,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self {
            text: None,
            category: None,
            in_stock_only: false,
            min_rating: None,
            sort: SortOption::Featured,
            page: 1,
            per_page: 24,
        }
    }

    /// Set the text query. Blank text is ignored.
    pub fn with_text(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.text = (!q.trim().is_empty()).then(|| q.trim().to_string());
        self
    }

    pub fn with_category(mut self, category: CategoryTag) -> Self {
        self.category = Some(category);
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Whether a product passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        if self.in_stock_only && !product.in_stock {
            return false;
        }
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if product.rating < min {
                return false;
            }
        }
        match &self.text {
            Some(text) => product.name_contains(text),
            None => true,
        }
    }

    /// Run the query over an already reconciled product list.
    ///
    /// Category counts are taken over every product that passes the
    /// non-category filters, so they can drive a category picker.
    pub fn apply(&self, products: Vec<Product>) -> QueryResults {
        let without_category = Self {
            category: None,
            ..self.clone()
        };

        let mut counts: Vec<CategoryCount> = Vec::new();
        let mut matched = Vec::new();
        for product in products {
            if !without_category.matches(&product) {
                continue;
            }
            match counts.iter_mut().find(|c| c.category == product.category) {
                Some(count) => count.count += 1,
                None => counts.push(CategoryCount {
                    category: product.category,
                    count: 1,
                }),
            }
            if self.matches(&product) {
                matched.push(product);
            }
        }
        counts.sort_by_key(|c| c.category);

        self.sort.sort(&mut matched);

        let pagination = Pagination::new(self.page, self.per_page, matched.len());
        let items = matched
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page)
            .collect();

        QueryResults {
            items,
            pagination,
            category_counts: counts,
        }
    }
}
