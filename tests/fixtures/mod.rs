//! Catalog-shaped fixtures with the prompt clauses each category must carry.

use virtual_tryon::models::item::ItemType;

#[derive(Debug, Clone)]
pub struct CatalogFixture {
    pub name: &'static str,
    pub item_type: ItemType,
    /// File name served by the fake image host.
    pub asset: &'static str,
    pub required_clauses: &'static [&'static str],
    pub expected_model: &'static str,
}

pub const CATALOG: &[CatalogFixture] = &[
    CatalogFixture {
        name: "Royal Gold Necklace",
        item_type: ItemType::Necklace,
        asset: "necklace1.png",
        required_clauses: &[
            "Remove any existing jewelry on the neck",
            "chest/sternum",
            "full length of the chain",
            "Do not crop",
        ],
        expected_model: "gemini_2.5_flash",
    },
    CatalogFixture {
        name: "Diamond Drop Earrings",
        item_type: ItemType::Earring,
        asset: "earrings1.png",
        required_clauses: &[
            "Remove any existing jewelry on the ears",
            "hang vertically from the earlobes",
        ],
        expected_model: "gemini_2.5_flash",
    },
    CatalogFixture {
        name: "Bridal Kundan Set",
        item_type: ItemType::Set,
        asset: "set1.png",
        required_clauses: &[
            "erase the existing necklace and earrings",
            "chest/sternum",
            "earlobes",
        ],
        expected_model: "gemini_2.5_flash",
    },
    CatalogFixture {
        name: "Yellow Floral Kurta Set",
        item_type: ItemType::Clothing,
        asset: "kurta1.png",
        required_clauses: &["Garment Transfer", "outfit entirely", "drape"],
        expected_model: "gen4_image",
    },
];

/// Clauses every prompt carries regardless of category.
pub const COMMON_CLAUSES: &[&str] = &["IDENTITY LOCK", "100% identical", "Input 2", "gravity"];
