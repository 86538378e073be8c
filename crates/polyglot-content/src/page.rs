//! Page kinds and logical page identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The template family a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Long-form guide with TOC, FAQ and sidebar
    Article,
    /// Legacy site page rebuilt from content blocks
    Backbone,
    /// Dated update post with a video embed
    Update,
    /// Question and answer page
    Faq,
    /// Contact form page
    Contact,
}

impl PageKind {
    /// All kinds in processing order.
    pub const ALL: [PageKind; 5] = [
        PageKind::Article,
        PageKind::Backbone,
        PageKind::Update,
        PageKind::Faq,
        PageKind::Contact,
    ];

    /// Lowercase name used in logs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Backbone => "backbone",
            Self::Update => "update",
            Self::Faq => "faq",
            Self::Contact => "contact",
        }
    }

    /// Column count for image grids that do not state one.
    pub fn default_grid_columns(&self) -> u32 {
        match self {
            Self::Update => 2,
            _ => 3,
        }
    }

    /// Open Graph type used when a variant does not override it.
    pub fn default_og_type(&self) -> &'static str {
        match self {
            Self::Article | Self::Backbone => "article",
            Self::Update | Self::Faq | Self::Contact => "website",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language-independent identity of a page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageKey {
    pub kind: PageKind,
    pub id: String,
}

impl PageKey {
    pub fn new(kind: PageKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
