//! Ingredient name normalization.
//!
//! Free-text ingredient names arrive from OCR output and user input in
//! every shape: "2 cups Fresh Chopped Tomatoes", "low sodium soy sauce",
//! "Garlic Cloves". [`Vocabulary::normalize`] folds them onto canonical
//! forms so the matcher compares like with like.
//!
//! The synonym, descriptor, and unit tables are immutable once a
//! [`Vocabulary`] is built. The built-in tables cover common pantry
//! staples; deployments can extend them with a TOML overlay.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{MmError, Result};

/// Canonical name -> surface variants. Kept as (canonical, variants)
/// pairs so the table reads like the data it is.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("tomato", &["tomatoes", "tomato paste", "cherry tomatoes", "roma tomatoes"]),
    ("onion", &["onions", "red onion", "white onion", "yellow onion", "shallots"]),
    ("garlic", &["garlic cloves", "garlic clove", "minced garlic"]),
    ("chicken", &["chicken breast", "chicken thighs", "chicken meat", "chicken pieces"]),
    ("beef", &["ground beef", "beef chunks", "beef strips", "steak"]),
    ("potato", &["potatoes", "sweet potato", "sweet potatoes"]),
    ("carrot", &["carrots", "baby carrots"]),
    ("bell pepper", &["bell peppers", "red pepper", "green pepper", "capsicum"]),
    ("cheese", &["cheddar", "mozzarella", "parmesan", "feta"]),
    ("milk", &["whole milk", "skim milk", "2% milk"]),
    ("flour", &["all-purpose flour", "wheat flour", "bread flour"]),
    ("rice", &["white rice", "brown rice", "basmati rice", "jasmine rice"]),
    ("pasta", &["spaghetti", "penne", "macaroni", "fusilli"]),
    ("egg", &["eggs", "egg whites", "egg yolks"]),
    ("butter", &["unsalted butter", "salted butter", "margarine"]),
    ("oil", &["olive oil", "vegetable oil", "canola oil", "cooking oil"]),
    ("salt", &["sea salt", "kosher salt", "table salt"]),
    ("pepper", &["black pepper", "white pepper"]),
    ("sugar", &["white sugar", "brown sugar", "powdered sugar"]),
    ("bread", &["white bread", "whole wheat bread", "sourdough"]),
    ("lettuce", &["iceberg lettuce", "romaine lettuce", "leaf lettuce"]),
    ("spinach", &["baby spinach", "fresh spinach"]),
    ("broccoli", &["broccoli florets", "broccoli crowns"]),
    ("mushroom", &["mushrooms", "button mushrooms", "portobello mushrooms"]),
    ("fish", &["salmon", "tuna", "cod", "tilapia"]),
    ("shrimp", &["prawns", "large shrimp", "small shrimp"]),
    ("tofu", &["firm tofu", "soft tofu", "silken tofu"]),
    ("bean", &["beans", "black beans", "kidney beans", "pinto beans"]),
    ("lentil", &["red lentils", "green lentils", "brown lentils"]),
    ("pea", &["peas", "green peas", "split peas"]),
    ("corn", &["corn kernels", "sweet corn", "corn on the cob"]),
    ("apple", &["apples", "granny smith apples", "red apples"]),
    ("banana", &["bananas", "ripe bananas"]),
    ("orange", &["oranges", "navel oranges"]),
    ("lemon", &["lemons", "lemon juice"]),
    ("lime", &["limes", "lime juice"]),
    ("strawberry", &["strawberries", "fresh strawberries"]),
    ("blueberry", &["blueberries", "fresh blueberries"]),
    ("chocolate", &["dark chocolate", "milk chocolate", "chocolate chips"]),
    ("vanilla", &["vanilla extract", "vanilla essence"]),
    ("cinnamon", &["ground cinnamon", "cinnamon sticks"]),
    ("cumin", &["ground cumin", "cumin seeds"]),
    ("paprika", &["sweet paprika", "smoked paprika"]),
    ("oregano", &["dried oregano", "fresh oregano"]),
    ("basil", &["fresh basil", "dried basil"]),
    ("thyme", &["fresh thyme", "dried thyme"]),
    ("rosemary", &["fresh rosemary", "dried rosemary"]),
    ("parsley", &["fresh parsley", "dried parsley"]),
    ("cilantro", &["fresh cilantro", "coriander"]),
    ("ginger", &["fresh ginger", "ground ginger", "ginger root"]),
    ("soy sauce", &["light soy sauce", "dark soy sauce", "low sodium soy sauce"]),
    ("vinegar", &["white vinegar", "apple cider vinegar", "rice vinegar"]),
    ("honey", &["raw honey", "pure honey"]),
    ("maple syrup", &["pure maple syrup"]),
    ("mustard", &["dijon mustard", "yellow mustard", "whole grain mustard"]),
    ("mayonnaise", &["mayo", "light mayonnaise"]),
    ("ketchup", &["tomato ketchup", "catsup"]),
    ("hot sauce", &["tabasco", "sriracha", "cholula"]),
    ("worcestershire sauce", &["worcestershire", "worcester sauce"]),
];

/// Preparation/grade words that never change what the ingredient is.
const DESCRIPTORS: &[&str] = &[
    "fresh", "dried", "ground", "chopped", "minced", "sliced", "diced",
    "grated", "shredded", "crushed", "whole", "large", "medium", "small",
    "extra large", "baby", "ripe", "raw", "cooked", "frozen", "canned",
    "low sodium", "reduced fat", "fat free", "organic", "wild caught",
];

/// Measurement units stripped together with a leading quantity.
const UNITS: &[&str] = &[
    "cup", "cups", "tbsp", "tsp", "oz", "lb", "lbs", "g", "kg", "ml", "l",
    "quart", "liter",
];

/// Optional extension to the built-in tables, usually loaded from TOML.
///
/// ```toml
/// descriptors = ["heirloom"]
/// units = ["pinch"]
///
/// [synonyms]
/// aubergine = ["eggplant", "eggplants"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularyOverlay {
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub descriptors: Vec<String>,
    #[serde(default)]
    pub units: Vec<String>,
}

impl VocabularyOverlay {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| MmError::Config(format!("parse vocabulary: {err}")))
    }

    /// Load an overlay from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}

/// Immutable ingredient vocabulary: synonym folding plus descriptor and
/// quantity stripping. Built once, shared read-only.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// variant (already lowercase) -> canonical. Every canonical maps to
    /// itself.
    reverse: BTreeMap<String, String>,
    /// canonical -> variants, for suggestions.
    forward: BTreeMap<String, Vec<String>>,
    descriptor_re: Regex,
    quantity_re: Regex,
}

impl Vocabulary {
    /// Vocabulary with the built-in tables only.
    #[must_use]
    pub fn builtin() -> Self {
        Self::build(None).unwrap_or_else(|_| unreachable!("built-in tables are valid"))
    }

    /// Built-in tables extended with an overlay.
    ///
    /// # Errors
    ///
    /// Returns [`MmError::InvalidVocabulary`] when an overlay canonical
    /// does not survive its own normalization (for example a canonical
    /// containing a descriptor word), which would break idempotence.
    pub fn with_overlay(overlay: VocabularyOverlay) -> Result<Self> {
        Self::build(Some(overlay))
    }

    fn build(overlay: Option<VocabularyOverlay>) -> Result<Self> {
        let mut forward: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (canonical, variants) in SYNONYMS {
            forward.insert(
                (*canonical).to_string(),
                variants.iter().map(|v| (*v).to_string()).collect(),
            );
        }

        let mut descriptors: Vec<String> =
            DESCRIPTORS.iter().map(|d| (*d).to_string()).collect();
        let mut units: Vec<String> = UNITS.iter().map(|u| (*u).to_string()).collect();

        if let Some(overlay) = overlay {
            for (canonical, variants) in overlay.synonyms {
                let entry = forward.entry(canonical.to_lowercase()).or_default();
                for variant in variants {
                    entry.push(variant.to_lowercase());
                }
            }
            descriptors.extend(overlay.descriptors.iter().map(|d| d.to_lowercase()));
            units.extend(overlay.units.iter().map(|u| u.to_lowercase()));
        }

        let descriptor_re = Self::descriptor_regex(&descriptors)?;
        let quantity_re = Self::quantity_regex(&units)?;

        let mut reverse = BTreeMap::new();
        for (canonical, variants) in &forward {
            for variant in variants {
                reverse.insert(variant.to_lowercase(), canonical.clone());
            }
            reverse.insert(canonical.clone(), canonical.clone());
        }

        let vocab = Self {
            reverse,
            forward,
            descriptor_re,
            quantity_re,
        };

        // A canonical that normalizes away from itself would make
        // normalize() non-idempotent.
        for canonical in vocab.forward.keys() {
            if vocab.normalize(canonical) != *canonical {
                return Err(MmError::InvalidVocabulary(format!(
                    "canonical '{canonical}' is not normalization-stable"
                )));
            }
        }

        Ok(vocab)
    }

    /// Whole-word alternation, longest descriptor first so multi-word
    /// descriptors strip as a unit.
    fn descriptor_regex(descriptors: &[String]) -> Result<Regex> {
        let mut sorted: Vec<&String> = descriptors.iter().collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = sorted
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{alternation})\b"))
            .map_err(|err| MmError::InvalidVocabulary(format!("descriptor pattern: {err}")))
    }

    fn quantity_regex(units: &[String]) -> Result<Regex> {
        let alternation = units
            .iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\d+\s*(?:{alternation})s?\b"))
            .map_err(|err| MmError::InvalidVocabulary(format!("quantity pattern: {err}")))
    }

    /// Canonicalize an ingredient name.
    ///
    /// Lowercases and trims, strips descriptors and quantity+unit tokens,
    /// collapses whitespace, then folds registered synonym variants onto
    /// their canonical form. Idempotent; empty input yields an empty
    /// string.
    #[must_use]
    pub fn normalize(&self, name: &str) -> String {
        let mut current = name.to_lowercase().trim().to_string();

        // Strip to a fixpoint: a removal can expose a new whole-word
        // occurrence, and idempotence is a contract of this function.
        loop {
            let stripped = self.strip_once(&current);
            if stripped == current {
                break;
            }
            current = stripped;
        }

        match self.reverse.get(&current) {
            Some(canonical) => canonical.clone(),
            None => current,
        }
    }

    fn strip_once(&self, name: &str) -> String {
        let without_descriptors = self.descriptor_re.replace_all(name, "");
        let without_quantities = self.quantity_re.replace_all(&without_descriptors, "");
        without_quantities.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// The canonical form for `normalized`, if it is a registered variant
    /// or canonical. Expects already-normalized input.
    #[must_use]
    pub fn canonical_of(&self, normalized: &str) -> Option<&str> {
        self.reverse.get(normalized).map(String::as_str)
    }

    /// Whether two normalized names are a registered synonym pair.
    #[must_use]
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        self.canonical_of(a) == Some(b) || self.canonical_of(b) == Some(a)
    }

    /// Completion suggestions for a partial ingredient name: canonicals
    /// first, then variants, each containing the normalized partial.
    #[must_use]
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = self.normalize(partial);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut suggestions = Vec::new();
        for (canonical, variants) in &self.forward {
            if canonical.contains(&needle) && !suggestions.contains(canonical) {
                suggestions.push(canonical.clone());
            }
            for variant in variants {
                if variant.contains(&needle) && !suggestions.contains(variant) {
                    suggestions.push(variant.clone());
                }
            }
        }
        suggestions.truncate(limit);
        suggestions
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
