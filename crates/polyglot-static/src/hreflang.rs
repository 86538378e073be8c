//! Alternate-language link blocks.

use std::collections::BTreeMap;

use polyglot_content::LanguageCode;

use crate::html::escape;

/// The `<link rel="alternate" hreflang>` block shared by every variant of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HreflangBlock(String);

impl HreflangBlock {
    /// Build the block for one logical page.
    ///
    /// Order is fixed: the source language, `x-default` pointing at the same
    /// URL, then every target language in lexicographic order.
    pub fn resolve(
        source: &LanguageCode,
        source_url: &str,
        targets: &BTreeMap<LanguageCode, String>,
    ) -> Self {
        let mut lines = Vec::with_capacity(targets.len() + 2);
        lines.push(link(source.as_str(), source_url));
        lines.push(link("x-default", source_url));
        lines.extend(
            targets
                .iter()
                .filter(|(lang, _)| *lang != source)
                .map(|(lang, url)| link(lang.as_str(), url)),
        );

        Self(lines.join("\n"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn link(lang: &str, url: &str) -> String {
    format!(
        r#"  <link rel="alternate" hreflang="{}" href="{}" />"#,
        escape(lang),
        escape(url)
    )
}
