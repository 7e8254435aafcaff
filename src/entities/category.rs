// 🏷️ Category Entity - named bucket with display color and icon
//
// "Category name is a VALUE (can change), Category id is IDENTITY (never changes)"
//
// Transactions copy the category NAME, so renaming a category here does not
// rewrite history. That gap is intentional and surfaced by the CLI.

use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Color used when a transaction's category name matches no category
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identity - NEVER changes
    pub id: String,

    /// Display name, matched against `Transaction::category`
    pub name: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Hex color (e.g. "#EF4444")
    pub color: String,

    /// Icon tag (e.g. "Car", "Banknote")
    pub icon: String,
}

impl Category {
    pub fn new(id: &str, name: &str, kind: TransactionKind, color: &str, icon: &str) -> Self {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn from_draft(id: String, draft: CategoryDraft) -> Self {
        Category {
            id,
            name: draft.name,
            kind: draft.kind,
            color: draft.color,
            icon: draft.icon,
        }
    }
}

/// Seed set written on first run
///
/// - Income: Salary, Freelance, Investment
/// - Expense: Food & Dining, Transportation, Shopping, Bills & Utilities, Healthcare
pub fn default_categories() -> Vec<Category> {
    use TransactionKind::{Expense, Income};

    vec![
        Category::new("1", "Salary", Income, "#10B981", "Banknote"),
        Category::new("2", "Freelance", Income, "#059669", "Laptop"),
        Category::new("3", "Investment", Income, "#047857", "TrendingUp"),
        Category::new("4", "Food & Dining", Expense, "#EF4444", "UtensilsCrossed"),
        Category::new("5", "Transportation", Expense, "#F97316", "Car"),
        Category::new("6", "Shopping", Expense, "#8B5CF6", "ShoppingBag"),
        Category::new("7", "Bills & Utilities", Expense, "#06B6D4", "Receipt"),
        Category::new("8", "Healthcare", Expense, "#EC4899", "Heart"),
    ]
}

// ============================================================================
// DRAFT & UPDATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: TransactionKind,
    pub color: String,
    pub icon: String,
}

impl CategoryDraft {
    /// Color/icon defaults match the first entries of the category form palette
    pub fn named(name: &str, kind: TransactionKind) -> Self {
        CategoryDraft {
            name: name.to_string(),
            kind,
            color: "#EF4444".to_string(),
            icon: "Tag".to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryUpdate {
    /// A present name must not be blank
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().map_or(true, |name| !name.trim().is_empty())
    }

    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(kind) = self.kind {
            category.kind = kind;
        }
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories() {
        let defaults = default_categories();

        assert_eq!(defaults.len(), 8);
        assert_eq!(
            defaults.iter().filter(|c| c.kind == TransactionKind::Income).count(),
            3
        );
        assert_eq!(
            defaults.iter().filter(|c| c.kind == TransactionKind::Expense).count(),
            5
        );

        let food = defaults.iter().find(|c| c.name == "Food & Dining").unwrap();
        assert_eq!(food.color, "#EF4444");
        assert_eq!(food.icon, "UtensilsCrossed");
    }

    #[test]
    fn test_default_ids_are_unique() {
        let defaults = default_categories();
        let mut ids: Vec<&str> = defaults.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), defaults.len());
    }

    #[test]
    fn test_category_update() {
        let mut category = Category::new("9", "Gym", TransactionKind::Expense, "#000000", "Dumbbell");

        CategoryUpdate {
            name: Some("Fitness".to_string()),
            ..Default::default()
        }
        .apply_to(&mut category);

        assert_eq!(category.id, "9");
        assert_eq!(category.name, "Fitness");
        assert_eq!(category.icon, "Dumbbell");
    }

    #[test]
    fn test_category_update_blank_name_is_incomplete() {
        let recolor = CategoryUpdate {
            color: Some("#111111".to_string()),
            ..Default::default()
        };
        assert!(recolor.is_complete());

        let blank = CategoryUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!blank.is_complete());
    }

    #[test]
    fn test_category_draft_presence() {
        assert!(CategoryDraft::named("Gifts", TransactionKind::Income).is_complete());
        assert!(!CategoryDraft::named("   ", TransactionKind::Income).is_complete());
    }
}
