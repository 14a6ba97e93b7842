//! Aggregates behind the dashboard charts. Pure functions of the item list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::Category;
use crate::normalize::Item;

const SLICE_CATEGORIES: [Category; 5] = [
    Category::Creatures,
    Category::Equipment,
    Category::Materials,
    Category::Monsters,
    Category::Treasure,
];

const EDIBILITY_CATEGORIES: [Category; 2] = [Category::Creatures, Category::Materials];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub slug: String,
    pub label: String,
    pub count: usize,
    /// Share of the counted items, 0..=100.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdibilityRow {
    pub label: String,
    pub edible: usize,
    pub not_edible: usize,
    pub total: usize,
}

fn category_of(item: &Item) -> Option<Category> {
    Category::parse_loose(Some(&item.category))
}

/// One slice per upstream category. Items outside the five are ignored.
pub fn category_breakdown(items: &[Item]) -> Vec<CategorySlice> {
    let counts: Vec<usize> = SLICE_CATEGORIES
        .iter()
        .map(|category| {
            items
                .iter()
                .filter(|item| category_of(item) == Some(*category))
                .count()
        })
        .collect();
    let counted: usize = counts.iter().sum();

    SLICE_CATEGORIES
        .iter()
        .zip(counts)
        .map(|(category, count)| CategorySlice {
            slug: category.as_slug().to_string(),
            label: category.label().to_string(),
            count,
            percent: percent_of(count, counted),
        })
        .collect()
}

/// Edible when the record says so, or when it restores hearts.
pub fn is_edible(item: &Item) -> bool {
    if item.raw.get("edible") == Some(&Value::Bool(true)) {
        return true;
    }
    match item.raw.get("hearts_recovered") {
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v > 0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().is_ok_and(|v| v > 0.0),
        _ => false,
    }
}

pub fn edibility_breakdown(items: &[Item]) -> Vec<EdibilityRow> {
    EDIBILITY_CATEGORIES
        .iter()
        .map(|category| {
            let subset: Vec<&Item> = items
                .iter()
                .filter(|item| category_of(item) == Some(*category))
                .collect();
            let edible = subset.iter().filter(|item| is_edible(item)).count();
            EdibilityRow {
                label: category.label().to_string(),
                edible,
                not_edible: subset.len() - edible,
                total: subset.len(),
            }
        })
        .collect()
}

/// round(100 * part / whole), 0 for an empty whole.
pub fn percent_of(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
