//! In-memory book catalog keyed by category.
//!
//! The catalog is built once at startup (either the built-in list or a JSON
//! file) and never mutated afterwards, so it can be shared between workers
//! behind an `Arc` without any locking.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use schema::{BookRecommendation, Category};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, Result};

/// One row of a JSON catalog file.
///
/// ```json
/// [{ "category": "mystery", "id": 1, "title": "The Maltese Falcon", "author": "Dashiell Hammett" }]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: String,
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub author: String,
}

/// Read-only collection of books per category, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: HashMap<Category, Vec<BookRecommendation>>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The nine books the service ships with, three per category.
    pub fn builtin() -> Self {
        let rows = [
            (Category::Mystery, 1, "The Maltese Falcon", "Dashiell Hammett"),
            (Category::Mystery, 2, "Murder on the Orient Express", "Agatha Christie"),
            (Category::Mystery, 3, "The Hound of the Baskervilles", "Arthur Conan Doyle"),
            (Category::ScienceFiction, 4, "The Hitchhiker's Guide to the Galaxy", "Douglas Adams"),
            (Category::ScienceFiction, 5, "Ender's Game", "Orson Scott Card"),
            (Category::ScienceFiction, 6, "The Dune Chronicles", "Frank Herbert"),
            (Category::SelfHelp, 7, "The 7 Habits of Highly Effective People", "Stephen R. Covey"),
            (Category::SelfHelp, 8, "How to Win Friends and Influence People", "Dale Carnegie"),
            (Category::SelfHelp, 9, "Man's Search for Meaning", "Viktor Frankl"),
        ];

        let mut catalog = Self::new();
        for (category, id, title, author) in rows {
            catalog
                .books
                .entry(category)
                .or_default()
                .push(BookRecommendation::new(id, title, author));
        }
        catalog
    }

    /// Build a catalog from parsed entries.
    ///
    /// Entries keep their relative order within a category. An unknown
    /// category name or a repeated id inside one category is an error.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let mut catalog = Self::new();
        let mut seen: HashSet<(Category, u32)> = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let category: Category = entry
                .category
                .parse()
                .map_err(|source| CatalogError::UnknownCategory { index, source })?;

            if !seen.insert((category, entry.id)) {
                return Err(CatalogError::DuplicateItem {
                    category,
                    id: entry.id,
                });
            }

            catalog
                .books
                .entry(category)
                .or_default()
                .push(BookRecommendation::new(entry.id, entry.title, entry.author));
        }

        Ok(catalog)
    }

    /// Load a JSON array of [`CatalogEntry`] rows from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::from_entries(entries)?;
        info!(
            "Loaded catalog from {} ({} books)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Books for `category` in catalog order. Empty if the category has none.
    pub fn books(&self, category: Category) -> &[BookRecommendation] {
        self.books
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of books available for `category`.
    pub fn size(&self, category: Category) -> usize {
        self.books(category).len()
    }

    /// Total number of books across all categories.
    pub fn len(&self) -> usize {
        self.books.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(category: &str, id: u32, title: &str) -> CatalogEntry {
        CatalogEntry {
            category: category.to_string(),
            id,
            title: title.to_string(),
            author: String::new(),
        }
    }

    #[test]
    fn test_builtin_has_three_books_per_category() {
        let catalog = Catalog::builtin();
        for category in Category::ALL {
            assert_eq!(catalog.size(category), 3, "{category}");
        }
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.books(Category::Mystery)[0].title, "The Maltese Falcon");
    }

    #[test]
    fn test_from_entries_keeps_order() {
        let catalog = Catalog::from_entries(vec![
            entry("mystery", 10, "B"),
            entry("self-help", 11, "X"),
            entry("mystery", 12, "A"),
        ])
        .unwrap();

        let titles: Vec<_> = catalog
            .books(Category::Mystery)
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, ["B", "A"]);
        assert_eq!(catalog.size(Category::ScienceFiction), 0);
    }

    #[test]
    fn test_from_entries_rejects_unknown_category() {
        let err = Catalog::from_entries(vec![entry("mystery", 1, "A"), entry("poetry", 2, "B")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { index: 1, .. }));
    }

    #[test]
    fn test_from_entries_rejects_duplicate_ids() {
        let err = Catalog::from_entries(vec![entry("mystery", 1, "A"), entry("mystery", 1, "B")])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateItem { category: Category::Mystery, id: 1 }
        ));

        // same id in another category is fine
        assert!(Catalog::from_entries(vec![entry("mystery", 1, "A"), entry("self-help", 1, "B")]).is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"category": "science-fiction", "id": 4, "title": "Solaris", "author": "Stanislaw Lem"}},
                {{"category": "SELF_HELP", "id": 5, "title": "Deep Work"}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.books(Category::ScienceFiction)[0].author, "Stanislaw Lem");
        assert_eq!(catalog.books(Category::SelfHelp)[0].author, "");
    }

    #[test]
    fn test_from_json_file_errors() {
        let missing = Catalog::from_json_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(missing, CatalogError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let bad = Catalog::from_json_file(file.path()).unwrap_err();
        assert!(matches!(bad, CatalogError::Parse { .. }));
    }
}
