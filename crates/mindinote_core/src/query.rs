//! crates/mindinote_core/src/query.rs
//!
//! Pure filtering and sorting over a note collection. Nothing here mutates its input,
//! so it is safe to call on every keystroke.

use crate::domain::{Category, CategoryFilter, Note};

/// Returns the notes passing both the category and the search predicate, pinned
/// notes first, then most recently updated first.
///
/// The sort is stable: notes with the same pin state and `updated_at` keep their
/// input order.
pub fn filter_and_sort(notes: &[Note], category: CategoryFilter, search_query: &str) -> Vec<Note> {
    let needle = search_query.to_lowercase();
    let mut view: Vec<Note> = notes
        .iter()
        .filter(|note| category.matches(note.category) && matches_search(note, &needle))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    view
}

fn matches_search(note: &Note, needle: &str) -> bool {
    needle.is_empty()
        || note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
}

/// Number of notes stored under each category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub total: usize,
    pub per_category: Vec<(Category, usize)>,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        self.per_category
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, n)| *n)
    }
}

/// Counts notes per category. Every category is present, with zero when empty.
pub fn category_counts(notes: &[Note]) -> CategoryCounts {
    let per_category = Category::ALL
        .into_iter()
        .map(|c| (c, notes.iter().filter(|n| n.category == c).count()))
        .collect();
    CategoryCounts {
        total: notes.len(),
        per_category,
    }
}
