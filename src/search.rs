//! Free-text search against the featured game.
//!
//! There is no index: a query either points at the one target label (or one
//! of its aliases) or it doesn't.

/// Aliases that always lead to the target, whatever its label.
pub const DEFAULT_KEYWORDS: &[&str] = &["buscar", "juego", "game", "play", "gba"];

pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Move focus to the primary game entry point.
    FocusTarget,
    /// Nothing matched. The caller shows `message` for a short while.
    NotFound { message: String },
}

/// [`SearchFilter::search`] with the built-in keyword set.
pub fn search(query: &str, target_label: &str) -> SearchAction {
    SearchFilter::default().search(query, target_label)
}

#[derive(Debug, Clone)]
pub struct SearchFilter {
    keywords: Vec<String>,
    not_found_message: String,
}

impl SearchFilter {
    pub fn new<I, S>(keywords: I, not_found_message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            not_found_message: not_found_message.into(),
        }
    }

    pub fn search(&self, query: &str, target_label: &str) -> SearchAction {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return SearchAction::FocusTarget;
        }

        let label_matches = target_label.to_lowercase().contains(&query);
        let keyword_matches = self
            .keywords
            .iter()
            .any(|keyword| query.contains(keyword.as_str()));

        if label_matches || keyword_matches {
            SearchAction::FocusTarget
        } else {
            SearchAction::NotFound {
                message: self.not_found_message.clone(),
            }
        }
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS, DEFAULT_NOT_FOUND_MESSAGE)
    }
}
