//! Category tags for product organization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed storefront categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryTag {
    DalsPulses,
    RiceProducts,
    Beverages,
    CookingOil,
    GheeVanaspati,
    SugarSaltJaggery,
    DryFruitsNuts,
    FloursGrains,
    SpicesHerbs,
    CleaningHomeCare,
    PersonalCare,
    FruitsVeggies,
    /// Catch-all when nothing more specific applies.
    #[default]
    Grocery,
    Electronics,
}

impl CategoryTag {
    /// Every tag, in declaration order.
    pub const ALL: [CategoryTag; 14] = [
        CategoryTag::DalsPulses,
        CategoryTag::RiceProducts,
        CategoryTag::Beverages,
        CategoryTag::CookingOil,
        CategoryTag::GheeVanaspati,
        CategoryTag::SugarSaltJaggery,
        CategoryTag::DryFruitsNuts,
        CategoryTag::FloursGrains,
        CategoryTag::SpicesHerbs,
        CategoryTag::CleaningHomeCare,
        CategoryTag::PersonalCare,
        CategoryTag::FruitsVeggies,
        CategoryTag::Grocery,
        CategoryTag::Electronics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::DalsPulses => "dals-pulses",
            CategoryTag::RiceProducts => "rice-products",
            CategoryTag::Beverages => "beverages",
            CategoryTag::CookingOil => "cooking-oil",
            CategoryTag::GheeVanaspati => "ghee-vanaspati",
            CategoryTag::SugarSaltJaggery => "sugar-salt-jaggery",
            CategoryTag::DryFruitsNuts => "dry-fruits-nuts",
            CategoryTag::FloursGrains => "flours-grains",
            CategoryTag::SpicesHerbs => "spices-herbs",
            CategoryTag::CleaningHomeCare => "cleaning-home-care",
            CategoryTag::PersonalCare => "personal-care",
            CategoryTag::FruitsVeggies => "fruits-veggies",
            CategoryTag::Grocery => "grocery",
            CategoryTag::Electronics => "electronics",
        }
    }

    /// Human-readable label for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryTag::DalsPulses => "Dals & Pulses",
            CategoryTag::RiceProducts => "Rice & Rice Products",
            CategoryTag::Beverages => "Beverages",
            CategoryTag::CookingOil => "Cooking Oil",
            CategoryTag::GheeVanaspati => "Ghee & Vanaspati",
            CategoryTag::SugarSaltJaggery => "Sugar, Salt & Jaggery",
            CategoryTag::DryFruitsNuts => "Dry Fruits & Nuts",
            CategoryTag::FloursGrains => "Flours & Grains",
            CategoryTag::SpicesHerbs => "Spices & Herbs",
            CategoryTag::CleaningHomeCare => "Cleaning & Home Care",
            CategoryTag::PersonalCare => "Personal Care",
            CategoryTag::FruitsVeggies => "Fruits & Vegetables",
            CategoryTag::Grocery => "Grocery",
            CategoryTag::Electronics => "Electronics",
        }
    }

    /// Parse a tag, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known category tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryTag {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip_through_strings() {
        for tag in CategoryTag::ALL {
            assert_eq!(CategoryTag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case() {
        assert_eq!(CategoryTag::parse(" Cooking-Oil "), Some(CategoryTag::CookingOil));
        assert_eq!(CategoryTag::parse("snacks"), None);
        assert!("snacks".parse::<CategoryTag>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&CategoryTag::SugarSaltJaggery).unwrap();
        assert_eq!(json, r#""sugar-salt-jaggery""#);

        let tag: CategoryTag = serde_json::from_str(r#""fruits-veggies""#).unwrap();
        assert_eq!(tag, CategoryTag::FruitsVeggies);
    }

    #[test]
    fn test_default_is_grocery() {
        assert_eq!(CategoryTag::default(), CategoryTag::Grocery);
    }
}
