//! Heading anchors.

use std::collections::HashSet;

/// Convert heading text to an anchor id.
///
/// Lowercases, drops everything that is not alphanumeric, whitespace, `-` or `_`,
/// turns runs of whitespace, `_` and `-` into a single `-` and trims hyphens.
/// The result only contains lowercase alphanumerics and `-`.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out unique anchor ids within one document.
#[derive(Debug, Default, Clone)]
pub struct AnchorSet {
    taken: HashSet<String>,
}

impl AnchorSet {
    /// Create a set where `ids` are already in use by the page chrome.
    pub fn with_reserved<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: ids.into_iter().map(str::to_string).collect(),
        }
    }

    /// Claim an id derived from `text`, suffixing `-2`, `-3`, ... on repeats.
    pub fn claim(&mut self, text: &str) -> String {
        let base = slugify(text);
        self.claim_id(if base.is_empty() { "section" } else { &base })
    }

    /// Claim `id` verbatim if free, otherwise the first free suffixed form.
    pub fn claim_id(&mut self, id: &str) -> String {
        if self.taken.insert(id.to_string()) {
            return id.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{id}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
