//! URL shapes and output locations.
//!
//! | Kind     | Source language        | Target language           |
//! |----------|------------------------|---------------------------|
//! | article  | `/{slug}/`             | `/{lang}/{slug}/`         |
//! | backbone | `/{slug}.html`         | `/{lang}/{slug}/`         |
//! | faq      | `/{slug}.html`         | `/{lang}/{slug}/`         |
//! | contact  | `/{slug}.html`         | `/{lang}/{slug}/`         |
//! | update   | `/updates/{slug}.html` | `/{lang}/updates/{slug}/` |

use std::path::PathBuf;

use polyglot_content::{LanguageCode, PageKind};

use crate::error::PolicyError;

/// Directory holding update posts.
const UPDATES_DIR: &str = "updates";

/// Check that `slug` is a single non-empty URL path segment.
pub fn validate_slug(slug: &str) -> Result<(), PolicyError> {
    if slug.is_empty() {
        return Err(PolicyError::EmptySlug);
    }

    let bad_char = |c: char| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#');
    if slug == "." || slug == ".." || slug.chars().any(bad_char) {
        return Err(PolicyError::InvalidSlug(slug.to_string()));
    }

    Ok(())
}

/// Where one variant of a page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub kind: PageKind,
    /// `None` for the source language
    pub lang: Option<LanguageCode>,
    pub slug: String,
}

impl Route {
    /// Route of a source-language variant.
    pub fn source(kind: PageKind, slug: impl Into<String>) -> Result<Self, PolicyError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self {
            kind,
            lang: None,
            slug,
        })
    }

    /// Route of a target-language variant.
    pub fn target(kind: PageKind, lang: LanguageCode, slug: impl Into<String>) -> Result<Self, PolicyError> {
        let slug = slug.into();
        validate_slug(&slug)?;
        Ok(Self {
            kind,
            lang: Some(lang),
            slug,
        })
    }

    /// Public path, starting with `/`.
    pub fn path(&self) -> String {
        match (&self.lang, self.kind) {
            (None, PageKind::Article) => format!("/{}/", self.slug),
            (None, PageKind::Update) => format!("/{}/{}.html", UPDATES_DIR, self.slug),
            (None, _) => format!("/{}.html", self.slug),
            (Some(lang), PageKind::Update) => format!("/{}/{}/{}/", lang, UPDATES_DIR, self.slug),
            (Some(lang), _) => format!("/{}/{}/", lang, self.slug),
        }
    }

    /// Absolute URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Output file relative to the output root.
    pub fn output_file(&self) -> PathBuf {
        let path = self.path();
        let relative = path.trim_start_matches('/');

        if relative.ends_with('/') {
            PathBuf::from(relative).join("index.html")
        } else {
            PathBuf::from(relative)
        }
    }

    /// Relative path from the emitted file back to the site root.
    pub fn asset_prefix(&self) -> String {
        let depth = self.output_file().components().count().saturating_sub(1);
        "../".repeat(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn es() -> LanguageCode {
        "es".parse().unwrap()
    }

    #[test]
    fn source_shapes() {
        let article = Route::source(PageKind::Article, "etoro-review").unwrap();
        assert_eq!(article.path(), "/etoro-review/");
        assert_eq!(article.output_file(), PathBuf::from("etoro-review/index.html"));
        assert_eq!(article.asset_prefix(), "../");

        let backbone = Route::source(PageKind::Backbone, "copy-trading").unwrap();
        assert_eq!(backbone.path(), "/copy-trading.html");
        assert_eq!(backbone.asset_prefix(), "");

        let faq = Route::source(PageKind::Faq, "faq").unwrap();
        assert_eq!(faq.url("https://example.com/"), "https://example.com/faq.html");

        let update = Route::source(PageKind::Update, "jan-2020").unwrap();
        assert_eq!(update.output_file(), PathBuf::from("updates/jan-2020.html"));
        assert_eq!(update.asset_prefix(), "../");
    }

    #[test]
    fn target_shapes() {
        let article = Route::target(PageKind::Article, es(), "resena").unwrap();
        assert_eq!(article.path(), "/es/resena/");
        assert_eq!(article.output_file(), PathBuf::from("es/resena/index.html"));
        assert_eq!(article.asset_prefix(), "../../");

        let contact = Route::target(PageKind::Contact, es(), "contacto").unwrap();
        assert_eq!(contact.asset_prefix(), "../../");

        let update = Route::target(PageKind::Update, es(), "enero-2020").unwrap();
        assert_eq!(update.path(), "/es/updates/enero-2020/");
        assert_eq!(update.output_file(), PathBuf::from("es/updates/enero-2020/index.html"));
        assert_eq!(update.asset_prefix(), "../../../");
    }

    #[test]
    fn rejects_bad_slugs() {
        assert_eq!(validate_slug(""), Err(PolicyError::EmptySlug));
        assert!(matches!(validate_slug(".."), Err(PolicyError::InvalidSlug(_))));
        assert!(matches!(validate_slug("a/b"), Err(PolicyError::InvalidSlug(_))));
        assert!(matches!(validate_slug("two words"), Err(PolicyError::InvalidSlug(_))));
        assert!(validate_slug("reseña-etoro").is_ok());
    }
}
