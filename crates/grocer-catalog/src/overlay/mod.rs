//! Local overrides layered on the base catalog.

mod document;
mod legacy;
mod store;

pub use document::{DeleteOutcome, EditOutcome, OverlayDocument};
pub use legacy::{LegacyImport, LEGACY_ADDED_KEY, LEGACY_DELETED_KEY, LEGACY_EDITED_KEY};
pub use store::{CatalogStore, DEFAULT_NAMESPACE};
