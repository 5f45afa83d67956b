//! Category Entities
//!
//! Two-level taxonomy: categories with optional subcategories.

use kernel::id::{CategoryId, SubCategoryId};

#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SubCategory {
    pub sub_category_id: SubCategoryId,
    pub category_id: CategoryId,
    pub name: String,
}

/// Category with its subcategories, as served by the API
#[derive(Debug, Clone)]
pub struct CategoryTree {
    pub category: Category,
    pub sub_categories: Vec<SubCategory>,
}
