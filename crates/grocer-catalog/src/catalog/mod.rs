//! Product catalog module.
//!
//! Contains the product type, category tags, the name classifier and the
//! immutable base catalog.

mod base;
mod category;
mod classifier;
mod product;

pub use base::BaseCatalog;
pub(crate) use base::product_from_value;
pub use category::{CategoryTag, UnknownCategory};
pub use classifier::{
    classify, Classifier, Rule, RuleMatch, CATALOG_RULES, OVERRIDE_RULES,
};
pub use product::{parse_rating, Product, ProductDraft, MAX_RATING};
