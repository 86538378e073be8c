//! Page variants: one logical page in one language.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{BlockError, ContentBlock, HeadingLevel};
use crate::language::LanguageCode;
use crate::page::PageKind;

/// A question and its plain-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

/// Localized replacements for the sidebar chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SidebarOverrides {
    #[serde(default)]
    pub cta_heading: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_button: Option<String>,
    #[serde(default)]
    pub nav_heading: Option<String>,
}

/// Localized labels of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_placeholder: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_placeholder: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_placeholder: Option<String>,
    #[serde(default)]
    pub submit: Option<String>,
}

/// A logical page rendered in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVariant {
    pub language: LanguageCode,
    /// Localized URL segment; ignored for the source language
    pub slug: String,
    /// `<title>` text; derived from the h1 when absent
    pub title: Option<String>,
    pub meta_description: String,
    pub h1: String,
    /// Breadcrumb tag shown above the h1
    pub tag: Option<String>,
    pub intro: Option<String>,
    pub body: Vec<ContentBlock>,
    pub faqs: Vec<FaqEntry>,
    /// Replaces the default byline under the h1
    pub byline: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_type: Option<String>,
    pub sidebar: SidebarOverrides,
    pub video_embed_src: Option<String>,
    pub video_embed_title: Option<String>,
    pub form_labels: ContactForm,
    pub reminder_title: Option<String>,
    pub reminder_text: Option<String>,
}

/// Errors produced while decoding a variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("block {index}: {source}")]
    Block { index: usize, source: BlockError },

    #[error("section {index}: {source}")]
    Section { index: usize, source: BlockError },

    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("{0}")]
    Invalid(String),
}

impl ContentError {
    /// Whether this failure comes from an unrecognized block type.
    pub fn is_unknown_block(&self) -> bool {
        matches!(
            self,
            Self::Block {
                source: BlockError::Unknown { .. },
                ..
            } | Self::Section {
                source: BlockError::Unknown { .. },
                ..
            }
        )
    }
}

#[derive(Debug, Deserialize)]
struct LegacySidebarCta {
    #[serde(default)]
    h3: Option<String>,
    #[serde(default)]
    p: Option<String>,
    #[serde(default)]
    btn: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SectionParagraph {
    Text(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawSection {
    h2: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    paragraphs: Vec<SectionParagraph>,
}

/// Wire shape of a variant. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawVariant {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(alias = "description")]
    meta_description: String,
    h1: String,
    #[serde(default, alias = "article_tag")]
    tag: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default, alias = "content", alias = "content_blocks")]
    body: Vec<Value>,
    #[serde(default)]
    sections: Vec<RawSection>,
    #[serde(default, alias = "questions")]
    faqs: Vec<FaqEntry>,
    #[serde(default, alias = "article_meta")]
    byline: Option<String>,
    #[serde(default)]
    og_title: Option<String>,
    #[serde(default)]
    og_description: Option<String>,
    #[serde(default)]
    og_type: Option<String>,
    #[serde(default)]
    sidebar_overrides: Option<SidebarOverrides>,
    #[serde(default)]
    sidebar_cta: Option<LegacySidebarCta>,
    #[serde(default, alias = "sidebar_nav_h4")]
    sidebar_nav_heading: Option<String>,
    #[serde(default)]
    sidebar_h3: Option<String>,
    #[serde(default)]
    sidebar_p: Option<String>,
    #[serde(default)]
    video_embed_src: Option<String>,
    #[serde(default)]
    video_embed_title: Option<String>,
    #[serde(default)]
    form_labels: Option<ContactForm>,
    #[serde(default)]
    reminder_title: Option<String>,
    #[serde(default)]
    reminder_text: Option<String>,
}

impl PageVariant {
    /// Decode a variant of a `kind` page written in `language`.
    pub fn decode(kind: PageKind, language: LanguageCode, value: &Value) -> Result<Self, ContentError> {
        if !value.is_object() {
            return Err(ContentError::NotAnObject);
        }

        let raw = RawVariant::deserialize(value).map_err(|e| ContentError::Invalid(e.to_string()))?;

        let columns = kind.default_grid_columns();
        let mut body = Vec::with_capacity(raw.body.len());
        for (index, value) in raw.body.iter().enumerate() {
            let block = ContentBlock::decode(value, columns)
                .map_err(|source| ContentError::Block { index, source })?;
            body.push(if kind == PageKind::Update {
                block.promote_inline_markup()
            } else {
                block
            });
        }

        for (index, section) in raw.sections.into_iter().enumerate() {
            body.extend(
                flatten_section(section).map_err(|source| ContentError::Section { index, source })?,
            );
        }

        if kind == PageKind::Article && raw.intro.as_deref().map_or(true, str::is_empty) {
            return Err(ContentError::MissingField("intro"));
        }

        let legacy = raw.sidebar_cta;
        let overrides = raw.sidebar_overrides.unwrap_or_default();
        let sidebar = SidebarOverrides {
            cta_heading: overrides
                .cta_heading
                .or_else(|| legacy.as_ref().and_then(|l| l.h3.clone()))
                .or(raw.sidebar_h3),
            cta_text: overrides
                .cta_text
                .or_else(|| legacy.as_ref().and_then(|l| l.p.clone()))
                .or(raw.sidebar_p),
            cta_button: overrides
                .cta_button
                .or_else(|| legacy.as_ref().and_then(|l| l.btn.clone())),
            nav_heading: overrides.nav_heading.or(raw.sidebar_nav_heading),
        };

        Ok(Self {
            language,
            slug: raw.slug,
            title: raw.title,
            meta_description: raw.meta_description,
            h1: raw.h1,
            tag: raw.tag.filter(|t| !t.is_empty()),
            intro: raw.intro,
            body,
            faqs: raw.faqs,
            byline: raw.byline,
            og_title: raw.og_title,
            og_description: raw.og_description,
            og_type: raw.og_type,
            sidebar,
            video_embed_src: raw.video_embed_src.filter(|s| !s.is_empty()),
            video_embed_title: raw.video_embed_title,
            form_labels: raw.form_labels.unwrap_or_default(),
            reminder_title: raw.reminder_title,
            reminder_text: raw.reminder_text,
        })
    }
}

/// Expand an article section into a heading followed by its paragraphs.
fn flatten_section(section: RawSection) -> Result<Vec<ContentBlock>, BlockError> {
    let mut blocks = vec![ContentBlock::Heading {
        level: HeadingLevel::H2,
        text: section.h2,
        id: section.id,
    }];

    for paragraph in section.paragraphs {
        blocks.push(match paragraph {
            SectionParagraph::Text(text) => ContentBlock::Paragraph { text },
            SectionParagraph::Typed { kind, text } => match kind.as_str() {
                "note" => ContentBlock::Note { text },
                "h3" => ContentBlock::Heading {
                    level: HeadingLevel::H3,
                    text,
                    id: None,
                },
                "p" => ContentBlock::Paragraph { text },
                _ => return Err(BlockError::Unknown { tag: kind }),
            },
        });
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn es() -> LanguageCode {
        "es".parse().unwrap()
    }

    #[test]
    fn decodes_backbone_variant_with_legacy_keys() {
        let value = json!({
            "slug": "copy-trading-es",
            "h1": "Copy Trading",
            "description": "Guía",
            "tag": "Guía",
            "content": [
                {"type": "h2", "text": "Qué es"},
                {"type": "p", "text": "Texto"}
            ],
            "sidebar_cta": {"h3": "¿Listo?", "btn": "Ir"},
            "sidebar_nav_heading": "Más",
            "unrelated_key": 42
        });

        let variant = PageVariant::decode(PageKind::Backbone, es(), &value).unwrap();

        assert_eq!(variant.slug, "copy-trading-es");
        assert_eq!(variant.meta_description, "Guía");
        assert_eq!(variant.body.len(), 2);
        assert_eq!(variant.sidebar.cta_heading.as_deref(), Some("¿Listo?"));
        assert_eq!(variant.sidebar.cta_button.as_deref(), Some("Ir"));
        assert_eq!(variant.sidebar.nav_heading.as_deref(), Some("Más"));
        assert_eq!(variant.sidebar.cta_text, None);
    }

    #[test]
    fn flattens_article_sections() {
        let value = json!({
            "slug": "demo-es",
            "h1": "Hola",
            "description": "d",
            "intro": "Intro",
            "sections": [
                {"h2": "Por qué", "id": "why", "paragraphs": ["Uno", {"type": "note", "text": "Nota"}]}
            ],
            "faqs": [{"q": "¿Sí?", "a": "Sí."}]
        });

        let variant = PageVariant::decode(PageKind::Article, es(), &value).unwrap();

        assert_eq!(
            variant.body,
            vec![
                ContentBlock::Heading {
                    level: HeadingLevel::H2,
                    text: "Por qué".into(),
                    id: Some("why".into())
                },
                ContentBlock::Paragraph { text: "Uno".into() },
                ContentBlock::Note {
                    text: "Nota".into()
                },
            ]
        );
        assert_eq!(variant.faqs[0].question, "¿Sí?");
    }

    #[test]
    fn article_requires_intro() {
        let value = json!({"slug": "x", "h1": "X", "meta_description": "d"});
        let err = PageVariant::decode(PageKind::Article, es(), &value).unwrap_err();
        assert_eq!(err, ContentError::MissingField("intro"));
    }

    #[test]
    fn unknown_block_is_reported_with_position() {
        let value = json!({
            "slug": "x",
            "h1": "X",
            "meta_description": "d",
            "content": [{"type": "p", "text": "ok"}, {"type": "mystery"}]
        });

        let err = PageVariant::decode(PageKind::Backbone, es(), &value).unwrap_err();

        assert!(err.is_unknown_block());
        assert_eq!(err.to_string(), "block 1: Unknown block type: \"mystery\"");
    }

    #[test]
    fn update_paragraphs_keep_inline_links() {
        let value = json!({
            "slug": "x",
            "h1": "X",
            "meta_description": "d",
            "content_blocks": [{"type": "p", "text": "Mira <a href=\"https://x.com\">esto</a>"}]
        });

        let variant = PageVariant::decode(PageKind::Update, es(), &value).unwrap();

        assert!(matches!(variant.body[0], ContentBlock::ParagraphHtml { .. }));
    }

    #[test]
    fn faq_page_reads_questions() {
        let value = json!({
            "slug": "preguntas-frecuentes",
            "h1": "Preguntas",
            "meta_description": "d",
            "questions": [{"question": "¿Qué?", "answer": "Esto."}],
            "sidebar_h3": "¿Listo?",
            "sidebar_nav_h4": "Guías"
        });

        let variant = PageVariant::decode(PageKind::Faq, es(), &value).unwrap();

        assert_eq!(variant.faqs.len(), 1);
        assert_eq!(variant.sidebar.cta_heading.as_deref(), Some("¿Listo?"));
        assert_eq!(variant.sidebar.nav_heading.as_deref(), Some("Guías"));
    }

    #[test]
    fn rejects_non_objects() {
        let err = PageVariant::decode(PageKind::Faq, es(), &json!([1, 2])).unwrap_err();
        assert_eq!(err, ContentError::NotAnObject);
    }
}
