//! Category-conditioned prompt construction.
//!
//! The generation model is steered only through prompt text, so each item
//! category maps to one `CategoryPolicy` row holding the clauses for that
//! category and the model role that renders it best.

use crate::config::AppConfig;
use crate::models::item::{ItemType, TryOnItem};

/// Runway rejects prompts longer than this many characters.
pub const MAX_PROMPT_CHARS: usize = 999;

const IDENTITY_LOCK: &str =
    "IDENTITY LOCK: Keep face, skin tone, hair, body and background 100% identical.";

const REALISM: &str = "Ultra-realistic, sharp focus. Match the photo's lighting, shadows and \
    color temperature; respect gravity.";

const JEWELRY_FIDELITY: &str = "NO NEW GEMS: Use ONLY the design, cut, stones and metal from \
    Input 2. Do not change stone or metal colors.";

const JEWELRY_FINISH: &str =
    "Realistic reflections and metal sheen; soft shadows cast onto the skin.";

/// Which configured model renders a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Garment,
    Jewelry,
}

/// Prompt clauses and model choice for one item category.
#[derive(Debug)]
pub struct CategoryPolicy {
    pub title: &'static str,
    pub product_label: &'static str,
    pub framing: &'static str,
    pub cleanup: &'static str,
    pub fidelity: &'static str,
    pub placement: &'static [&'static str],
    pub finish: &'static str,
    pub model_role: ModelRole,
}

pub static CLOTHING: CategoryPolicy = CategoryPolicy {
    title: "High-Fidelity Garment Transfer",
    product_label: "Garment",
    framing: "Keep the original aspect ratio. Do not crop.",
    cleanup: "Replace the Customer's current outfit entirely with the garment from Input 2.",
    fidelity: "Wrap the EXACT fabric, pattern and color from Input 2 onto the Customer. \
        Invent no new details.",
    placement: &["Fit the garment to the Customer's pose and body shape."],
    finish: "Natural fabric drape, folds and wrinkles that follow the pose.",
    model_role: ModelRole::Garment,
};

pub static NECKLACE: CategoryPolicy = CategoryPolicy {
    title: "Technical Photo Composite (Necklace)",
    product_label: "Necklace",
    framing: "Keep the original aspect ratio. Do not crop the bottom.",
    cleanup: "Remove any existing jewelry on the neck completely and cleanly.",
    fidelity: JEWELRY_FIDELITY,
    placement: &["The necklace must rest naturally on the skin of the upper chest/sternum. \
        Show the full length of the chain. Do not crop."],
    finish: JEWELRY_FINISH,
    model_role: ModelRole::Jewelry,
};

pub static EARRING: CategoryPolicy = CategoryPolicy {
    title: "Technical Photo Composite (Earrings)",
    product_label: "Earrings",
    framing: "Keep the original aspect ratio. Do not crop the bottom.",
    cleanup: "Remove any existing jewelry on the ears completely and cleanly.",
    fidelity: JEWELRY_FIDELITY,
    placement: &["The earrings must hang vertically from the earlobes."],
    finish: JEWELRY_FINISH,
    model_role: ModelRole::Jewelry,
};

pub static SET: CategoryPolicy = CategoryPolicy {
    title: "Technical Photo Composite (Jewelry Set)",
    product_label: "Jewelry Set",
    framing: "Do not crop. Maintain full view of chest/shoulders.",
    cleanup: "If the Customer wears old jewelry, erase the existing necklace and earrings \
        completely and cleanly.",
    fidelity: JEWELRY_FIDELITY,
    placement: &[
        "Necklace: rest naturally on the upper chest/sternum. Show full length.",
        "Earrings: hang vertically from the earlobes.",
        "Render both pieces in one composite.",
    ],
    finish: JEWELRY_FINISH,
    model_role: ModelRole::Jewelry,
};

/// Look up the policy for a category. Unknown categories are treated as a
/// single necklace.
pub fn policy_for(item_type: ItemType) -> &'static CategoryPolicy {
    match item_type {
        ItemType::Clothing => &CLOTHING,
        ItemType::Earring => &EARRING,
        ItemType::Set => &SET,
        ItemType::Necklace | ItemType::Other => &NECKLACE,
    }
}

/// Build the generation prompt for an item.
pub fn build_prompt(item: &TryOnItem) -> String {
    render(policy_for(item.item_type))
}

fn render(policy: &CategoryPolicy) -> String {
    let mut lines = vec![
        format!("Task: {}.", policy.title),
        "Input 1: Customer.".to_string(),
        format!("Input 2: {} (Product).", policy.product_label),
        format!("FRAMING: {}", policy.framing),
        format!("CLEANUP: {}", policy.cleanup),
        "RULES:".to_string(),
        format!("1. PRODUCT FIDELITY: {}", policy.fidelity),
        format!("2. {IDENTITY_LOCK}"),
        "3. PLACEMENT:".to_string(),
    ];
    lines.extend(policy.placement.iter().map(|rule| format!("- {rule}")));
    lines.push(format!("REALISM: {REALISM} {}", policy.finish));
    lines.join("\n")
}

/// Model ids per role, taken from configuration.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub garment: String,
    pub jewelry: String,
}

impl ModelSelection {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            garment: config.garment_model.clone(),
            jewelry: config.jewelry_model.clone(),
        }
    }

    pub fn model_for(&self, item_type: ItemType) -> &str {
        match policy_for(item_type).model_role {
            ModelRole::Garment => &self.garment,
            ModelRole::Jewelry => &self.jewelry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_for(item_type: ItemType) -> String {
        build_prompt(&TryOnItem::new("Sample", item_type, "https://cdn.test/p.png"))
    }

    fn assert_common_clauses(prompt: &str) {
        assert!(prompt.contains("IDENTITY LOCK"), "identity lock missing:\n{prompt}");
        assert!(prompt.contains("100% identical"));
        assert!(prompt.contains("Input 2"), "product fidelity missing:\n{prompt}");
        assert!(prompt.contains("lighting, shadows"), "realism missing:\n{prompt}");
        assert!(prompt.contains("gravity"));
    }

    #[test]
    fn test_necklace_prompt() {
        let prompt = prompt_for(ItemType::Necklace);
        assert_common_clauses(&prompt);
        assert!(prompt.contains("Remove any existing jewelry on the neck"));
        assert!(prompt.contains("chest/sternum"));
        assert!(prompt.contains("full length of the chain"));
        assert!(prompt.contains("Do not crop"));
        assert!(prompt.contains("NO NEW GEMS"));
    }

    #[test]
    fn test_earring_prompt() {
        let prompt = prompt_for(ItemType::Earring);
        assert_common_clauses(&prompt);
        assert!(prompt.contains("Remove any existing jewelry on the ears"));
        assert!(prompt.contains("hang vertically from the earlobes"));
        assert!(!prompt.contains("sternum"));
    }

    #[test]
    fn test_set_prompt() {
        let prompt = prompt_for(ItemType::Set);
        assert_common_clauses(&prompt);
        assert!(prompt.contains("erase the existing necklace and earrings"));
        assert!(prompt.contains("chest/sternum"));
        assert!(prompt.contains("earlobes"));
        assert!(prompt.contains("one composite"));
    }

    #[test]
    fn test_clothing_prompt() {
        let prompt = prompt_for(ItemType::Clothing);
        assert_common_clauses(&prompt);
        assert!(prompt.contains("Garment Transfer"));
        assert!(prompt.contains("Replace the Customer's current outfit entirely"));
        assert!(prompt.contains("drape"));
        assert!(!prompt.contains("NO NEW GEMS"));
    }

    #[test]
    fn test_unknown_type_uses_necklace_policy() {
        assert_eq!(prompt_for(ItemType::Other), prompt_for(ItemType::Necklace));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let item = TryOnItem::new("Emerald Pendant", ItemType::Necklace, "https://cdn.test/e.png");
        assert_eq!(build_prompt(&item), build_prompt(&item));
    }

    #[test]
    fn test_every_prompt_fits_api_limit() {
        for item_type in [
            ItemType::Necklace,
            ItemType::Earring,
            ItemType::Set,
            ItemType::Clothing,
            ItemType::Other,
        ] {
            let len = prompt_for(item_type).chars().count();
            assert!(len <= MAX_PROMPT_CHARS, "{item_type} prompt is {len} chars");
        }
    }

    #[test]
    fn test_model_selection_by_role() {
        let models = ModelSelection {
            garment: "gen4_image".to_string(),
            jewelry: "gemini_2.5_flash".to_string(),
        };
        assert_eq!(models.model_for(ItemType::Clothing), "gen4_image");
        assert_eq!(models.model_for(ItemType::Necklace), "gemini_2.5_flash");
        assert_eq!(models.model_for(ItemType::Set), "gemini_2.5_flash");
        assert_eq!(models.model_for(ItemType::Other), "gemini_2.5_flash");
    }
}
