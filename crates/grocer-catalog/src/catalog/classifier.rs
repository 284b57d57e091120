//! Keyword classifier mapping product names to category tags.
//!
//! Rules are evaluated in a fixed priority order and the first rule with a
//! keyword occurring anywhere in the lower-cased name wins. A narrower set of
//! override rules runs ahead of the catalog rules; today that is the single
//! "oil" rule, which also governs the add/edit submission path where it takes
//! precedence over whatever category the caller supplied.

use std::sync::OnceLock;

use crate::catalog::CategoryTag;

/// A keyword rule: any keyword matching as a substring selects `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub category: CategoryTag,
    pub keywords: &'static [&'static str],
}

impl Rule {
    /// First keyword contained in an already lower-cased name.
    fn matching_keyword(&self, lowered: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|kw| lowered.contains(kw))
    }
}

/// Rules that beat everything else, including a caller-supplied category.
pub const OVERRIDE_RULES: &[Rule] = &[Rule {
    category: CategoryTag::CookingOil,
    keywords: &["oil"],
}];

/// Catalog rules in priority order.
pub const CATALOG_RULES: &[Rule] = &[
    Rule {
        category: CategoryTag::DalsPulses,
        keywords: &[
            "dal", "daal", "pulse", "lentil", "moong", "masoor", "urad", "toor", "arhar",
            "chana", "rajma", "lobia", "chole", "kabuli",
        ],
    },
    Rule {
        category: CategoryTag::RiceProducts,
        keywords: &["rice", "basmati", "poha", "kolam", "sona masoori"],
    },
    Rule {
        category: CategoryTag::Beverages,
        keywords: &[
            "tea", "coffee", "juice", "drink", "soda", "coca-cola", "pepsi", "sharbat", "squash",
            "horlicks", "bournvita",
        ],
    },
    Rule {
        category: CategoryTag::CookingOil,
        keywords: &["oil"],
    },
    Rule {
        category: CategoryTag::GheeVanaspati,
        keywords: &["ghee", "vanaspati"],
    },
    Rule {
        category: CategoryTag::SugarSaltJaggery,
        keywords: &["sugar", "salt", "jaggery", "shakkar", "mishri"],
    },
    Rule {
        category: CategoryTag::DryFruitsNuts,
        keywords: &[
            "almond", "badam", "cashew", "kaju", "raisin", "kishmish", "walnut", "akhrot",
            "pista", "dates", "anjeer", "makhana", "nut",
        ],
    },
    Rule {
        category: CategoryTag::FloursGrains,
        keywords: &[
            "atta", "flour", "maida", "besan", "sooji", "suji", "rava", "wheat", "millet",
            "ragi", "jowar", "bajra", "oats", "grain",
        ],
    },
    Rule {
        category: CategoryTag::SpicesHerbs,
        keywords: &[
            "masala", "spice", "haldi", "turmeric", "chilli", "chili", "mirch", "jeera",
            "cumin", "dhania", "coriander", "pepper", "cardamom", "elaichi", "clove",
            "cinnamon", "asafoetida", "methi", "ajwain", "saunf", "herb",
        ],
    },
    Rule {
        category: CategoryTag::CleaningHomeCare,
        keywords: &[
            "detergent", "washing", "dishwash", "cleaner", "floor", "toilet", "phenyl",
            "bleach", "surf", "vim", "harpic", "lizol", "mop", "scrub",
        ],
    },
    Rule {
        category: CategoryTag::PersonalCare,
        keywords: &[
            "soap", "shampoo", "toothpaste", "tooth", "cream", "lotion", "face wash",
            "facewash", "body wash", "handwash", "sanitizer", "deo", "perfume", "hair",
        ],
    },
    Rule {
        category: CategoryTag::FruitsVeggies,
        keywords: &[
            "apple", "banana", "mango", "orange", "grape", "lemon", "onion", "potato",
            "tomato", "carrot", "spinach", "palak", "cabbage", "cauliflower", "brinjal",
            "okra", "bhindi", "ginger", "garlic", "fruit", "vegetable", "veggie",
        ],
    },
];

/// Which rule matched a name, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub category: CategoryTag,
    pub keyword: &'static str,
    /// Whether the match came from the override rules.
    pub overriding: bool,
}

/// Deterministic name-to-category classifier.
///
/// Stateless apart from its rule tables, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    overrides: &'static [Rule],
    rules: &'static [Rule],
    default_category: CategoryTag,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            overrides: OVERRIDE_RULES,
            rules: CATALOG_RULES,
            default_category: CategoryTag::default(),
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared classifier with the built-in rule tables.
    pub fn shared() -> &'static Classifier {
        static SHARED: OnceLock<Classifier> = OnceLock::new();
        SHARED.get_or_init(Classifier::new)
    }

    /// Replace the category used when nothing matches and no fallback is given.
    pub fn with_default_category(mut self, category: CategoryTag) -> Self {
        self.default_category = category;
        self
    }

    pub fn default_category(&self) -> CategoryTag {
        self.default_category
    }

    /// Classify a product name.
    ///
    /// `fallback` is used when no rule matches; an empty or unrecognised
    /// fallback resolves to the default category. An empty name skips rule
    /// evaluation altogether.
    pub fn classify(&self, name: &str, fallback: &str) -> CategoryTag {
        match self.explain(name) {
            Some(m) => m.category,
            None => self.resolve_fallback(fallback),
        }
    }

    /// Like [`classify`](Self::classify) but with an already-typed fallback.
    pub fn classify_or(&self, name: &str, fallback: CategoryTag) -> CategoryTag {
        self.explain(name).map(|m| m.category).unwrap_or(fallback)
    }

    /// Category for a product being added or edited by an admin.
    ///
    /// Only the override rules are consulted; otherwise the supplied category
    /// is kept as is.
    pub fn submission_category(&self, name: &str, supplied: CategoryTag) -> CategoryTag {
        let lowered = name.to_lowercase();
        first_match(self.overrides, &lowered)
            .map(|(rule, _)| rule.category)
            .unwrap_or(supplied)
    }

    /// The rule and keyword that decide `name`, if any.
    pub fn explain(&self, name: &str) -> Option<RuleMatch> {
        if name.trim().is_empty() {
            return None;
        }
        let lowered = name.to_lowercase();

        if let Some((rule, keyword)) = first_match(self.overrides, &lowered) {
            return Some(RuleMatch {
                category: rule.category,
                keyword,
                overriding: true,
            });
        }

        first_match(self.rules, &lowered).map(|(rule, keyword)| RuleMatch {
            category: rule.category,
            keyword,
            overriding: false,
        })
    }

    fn resolve_fallback(&self, fallback: &str) -> CategoryTag {
        if fallback.trim().is_empty() {
            return self.default_category;
        }
        CategoryTag::parse(fallback).unwrap_or_else(|| {
            tracing::debug!(fallback, "unknown fallback category, using default");
            self.default_category
        })
    }
}

fn first_match<'r>(rules: &'r [Rule], lowered: &str) -> Option<(&'r Rule, &'static str)> {
    rules
        .iter()
        .find_map(|rule| rule.matching_keyword(lowered).map(|kw| (rule, kw)))
}

/// Classify with the built-in rules.
pub fn classify(name: &str, fallback: &str) -> CategoryTag {
    Classifier::shared().classify(name, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oil_override() {
        assert_eq!(
            classify("Sunflower Cooking Oil 1L", "grocery"),
            CategoryTag::CookingOil
        );
        assert_eq!(classify("Mustard Oil", "grocery"), CategoryTag::CookingOil);
        // Ahead of the rice rule that would otherwise win.
        assert_eq!(classify("Rice Bran Oil", "grocery"), CategoryTag::CookingOil);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            classify("Basmati Rice Dal Mix", "grocery"),
            CategoryTag::DalsPulses
        );
        assert_eq!(classify("Orange Juice", "grocery"), CategoryTag::Beverages);
        assert_eq!(classify("Coconut Water", "grocery"), CategoryTag::DryFruitsNuts);
    }

    #[test]
    fn test_rule_categories() {
        let cases = [
            ("Toor Dal 1kg", CategoryTag::DalsPulses),
            ("India Gate Basmati", CategoryTag::RiceProducts),
            ("Tata Tea Gold", CategoryTag::Beverages),
            ("Amul Pure Ghee", CategoryTag::GheeVanaspati),
            ("Tata Salt", CategoryTag::SugarSaltJaggery),
            ("California Almonds", CategoryTag::DryFruitsNuts),
            ("Aashirvaad Atta", CategoryTag::FloursGrains),
            ("Garam Masala", CategoryTag::SpicesHerbs),
            ("Surf Excel Detergent", CategoryTag::CleaningHomeCare),
            ("Dove Shampoo", CategoryTag::PersonalCare),
            ("Fresh Tomato", CategoryTag::FruitsVeggies),
        ];
        for (name, expected) in cases {
            assert_eq!(classify(name, "grocery"), expected, "{name}");
        }
    }

    #[test]
    fn test_chocolate_is_not_a_drink() {
        assert_eq!(classify("Dairy Milk Chocolate", ""), CategoryTag::Grocery);
        assert_eq!(classify("Coca-Cola 750ml", ""), CategoryTag::Beverages);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("MUSTARD OIL", ""), CategoryTag::CookingOil);
        assert_eq!(classify("bAsMaTi", ""), CategoryTag::RiceProducts);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify("Xyzzy Widget", "grocery"), CategoryTag::Grocery);
        assert_eq!(classify("Xyzzy Widget", "electronics"), CategoryTag::Electronics);
        assert_eq!(classify("Xyzzy Widget", ""), CategoryTag::Grocery);
        assert_eq!(classify("Xyzzy Widget", "not-a-category"), CategoryTag::Grocery);
    }

    #[test]
    fn test_empty_name_uses_fallback() {
        assert_eq!(classify("", "beverages"), CategoryTag::Beverages);
        assert_eq!(classify("   ", ""), CategoryTag::Grocery);
        assert_eq!(Classifier::new().explain(""), None);
    }

    #[test]
    fn test_custom_default_category() {
        let classifier = Classifier::new().with_default_category(CategoryTag::Electronics);
        assert_eq!(classifier.classify("Xyzzy Widget", ""), CategoryTag::Electronics);
    }

    #[test]
    fn test_deterministic() {
        let first = classify("Organic Jaggery Powder", "grocery");
        let second = classify("Organic Jaggery Powder", "grocery");
        assert_eq!(first, second);
    }

    #[test]
    fn test_submission_category() {
        let classifier = Classifier::new();
        assert_eq!(
            classifier.submission_category("Groundnut Oil", CategoryTag::Grocery),
            CategoryTag::CookingOil
        );
        // Only the override applies on submission; the admin's choice stands otherwise.
        assert_eq!(
            classifier.submission_category("Basmati Rice", CategoryTag::Grocery),
            CategoryTag::Grocery
        );
    }

    #[test]
    fn test_explain_reports_keyword() {
        let m = Classifier::new().explain("Kashmiri Chilli Powder").unwrap();
        assert_eq!(m.category, CategoryTag::SpicesHerbs);
        assert_eq!(m.keyword, "chilli");
        assert!(!m.overriding);

        let m = Classifier::new().explain("Olive Oil").unwrap();
        assert!(m.overriding);
    }
}
