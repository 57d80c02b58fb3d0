use serde::{Deserialize, Serialize};

/// The four catalog dimensions a product is classified under. Admin
/// endpoints accept any of them as a flexible identifier (id, exact name,
/// or slug).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Brand,
    Category,
    Subcategory,
    ProductType,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogKind::Brand => write!(f, "brand"),
            CatalogKind::Category => write!(f, "category"),
            CatalogKind::Subcategory => write!(f, "subcategory"),
            CatalogKind::ProductType => write!(f, "product_type"),
        }
    }
}

/// Generate a URL-safe slug from a display name.
#[must_use]
pub fn slug_from_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
