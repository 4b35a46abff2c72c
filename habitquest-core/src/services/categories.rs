// src/services/categories.rs
//! Category list defaults and per-category target progress.

use crate::model::{Category, Habit};

/// Seed list for a fresh session.
pub fn defaults() -> Vec<Category> {
    [
        ("Health", "🍎"),
        ("Productivity", "⚡"),
        ("Mindset", "🧠"),
        ("Fitness", "💪"),
        ("Learning", "📚"),
    ]
    .iter()
    .map(|(name, icon)| Category {
        name: name.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub name: String,
    pub icon: String,
    /// Member habits that declare a streak target.
    pub with_target: usize,
    /// Of those, how many have met it.
    pub reached: usize,
    /// reached / with_target as a fraction in [0, 1]; 0.0 when no member
    /// declares a target (defined, never NaN).
    pub progress: f64,
}

/// Aggregate target progress per category. Habits without a target stay out
/// of both numerator and denominator but still belong to the category for
/// display purposes.
pub fn progress(categories: &[Category], habits: &[Habit]) -> Vec<CategoryProgress> {
    categories
        .iter()
        .map(|cat| {
            let with_target: Vec<&Habit> = habits
                .iter()
                .filter(|h| h.category == cat.name)
                .filter(|h| matches!(h.target_streak, Some(t) if t > 0))
                .collect();
            let reached = with_target.iter().filter(|h| h.target_reached()).count();
            let progress = if with_target.is_empty() {
                0.0
            } else {
                reached as f64 / with_target.len() as f64
            };
            CategoryProgress {
                name: cat.name.clone(),
                icon: cat.icon.clone(),
                with_target: with_target.len(),
                reached,
                progress,
            }
        })
        .collect()
}
