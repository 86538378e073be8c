//! Content blocks and their strict decoding.

use serde::Deserialize;
use serde_json::Value;

/// Heading level allowed inside page bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    /// Element name for this level.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

/// An image reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    /// Site-relative or absolute source
    pub src: String,
    /// Alternative text, always emitted (may be empty)
    pub alt: String,
    /// Optional CSS class
    #[serde(default)]
    pub class: Option<String>,
}

/// An image wrapped in a link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkedImage {
    pub src: String,
    pub alt: String,
    #[serde(default = "default_href")]
    pub href: String,
}

fn default_href() -> String {
    "#".to_string()
}

/// One unit of localized body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Plain copy, escaped on render
    Paragraph { text: String },
    /// Copy with inline markup, emitted verbatim
    ParagraphHtml { html: String },
    /// Highlighted aside paragraph
    Note { text: String },
    Heading {
        level: HeadingLevel,
        text: String,
        /// Explicit anchor id
        id: Option<String>,
    },
    Image(Image),
    /// Floated author portrait
    Portrait(Image),
    ImageGrid { columns: u32, images: Vec<Image> },
    ImageRow { images: Vec<LinkedImage> },
    BulletList { items: Vec<String> },
    VideoEmbed { src: String, title: String },
    /// Falls back to the localized standard warning when fields are absent
    RiskWarning {
        title: Option<String>,
        text: Option<String>,
    },
    InlineCta { text: String, href: String },
    ButtonOutline { text: String, href: String },
    ClearFloat,
}

/// Errors produced while decoding a block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Unknown block type: {tag:?}")]
    Unknown { tag: String },

    #[error("Block is missing its \"type\" field")]
    MissingType,

    #[error("Invalid {tag:?} block: {message}")]
    Invalid { tag: String, message: String },
}

/// Every `type` value accepted in translation documents.
const KNOWN_BLOCK_TYPES: &[&str] = &[
    "p",
    "paragraph",
    "p_html",
    "paragraph_html",
    "note",
    "h2",
    "h3",
    "heading",
    "img",
    "image",
    "img_about",
    "portrait",
    "img_grid",
    "image_grid",
    "img_row",
    "image_row",
    "ul",
    "bullet_list",
    "video_embed",
    "risk_warning",
    "inline_cta",
    "btn_outline",
    "button_outline",
    "clear",
    "clear_float",
];

/// Wire shape of a block, discriminated by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawBlock {
    #[serde(rename = "p", alias = "paragraph")]
    Paragraph { text: String },
    #[serde(rename = "p_html", alias = "paragraph_html")]
    ParagraphHtml { html: String },
    #[serde(rename = "note")]
    Note { text: String },
    #[serde(rename = "h2")]
    H2 {
        text: String,
        #[serde(default)]
        id: Option<String>,
    },
    #[serde(rename = "h3")]
    H3 {
        text: String,
        #[serde(default)]
        id: Option<String>,
    },
    #[serde(rename = "heading")]
    Heading {
        level: u8,
        text: String,
        #[serde(default)]
        id: Option<String>,
    },
    #[serde(rename = "img", alias = "image")]
    Image(Image),
    #[serde(rename = "img_about", alias = "portrait")]
    Portrait(Image),
    #[serde(rename = "img_grid", alias = "image_grid")]
    ImageGrid {
        #[serde(default, alias = "columns")]
        cols: Option<u32>,
        images: Vec<Image>,
    },
    #[serde(rename = "img_row", alias = "image_row")]
    ImageRow { images: Vec<LinkedImage> },
    #[serde(rename = "ul", alias = "bullet_list")]
    BulletList { items: Vec<String> },
    #[serde(rename = "video_embed")]
    VideoEmbed {
        src: String,
        #[serde(default)]
        title: String,
    },
    #[serde(rename = "risk_warning")]
    RiskWarning {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(rename = "inline_cta")]
    InlineCta { text: String, href: String },
    #[serde(rename = "btn_outline", alias = "button_outline")]
    ButtonOutline {
        text: String,
        #[serde(default = "default_href")]
        href: String,
    },
    #[serde(rename = "clear", alias = "clear_float")]
    ClearFloat,
}

impl ContentBlock {
    /// Decode one block from its JSON form.
    ///
    /// Unknown `type` values are rejected with [`BlockError::Unknown`];
    /// `default_columns` applies to image grids without an explicit count.
    pub fn decode(value: &Value, default_columns: u32) -> Result<Self, BlockError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(BlockError::MissingType)?;

        if !KNOWN_BLOCK_TYPES.contains(&tag) {
            return Err(BlockError::Unknown {
                tag: tag.to_string(),
            });
        }

        let raw = RawBlock::deserialize(value).map_err(|e| BlockError::Invalid {
            tag: tag.to_string(),
            message: e.to_string(),
        })?;

        let block = match raw {
            RawBlock::Paragraph { text } => Self::Paragraph { text },
            RawBlock::ParagraphHtml { html } => Self::ParagraphHtml { html },
            RawBlock::Note { text } => Self::Note { text },
            RawBlock::H2 { text, id } => Self::Heading {
                level: HeadingLevel::H2,
                text,
                id,
            },
            RawBlock::H3 { text, id } => Self::Heading {
                level: HeadingLevel::H3,
                text,
                id,
            },
            RawBlock::Heading { level, text, id } => {
                let level = match level {
                    2 => HeadingLevel::H2,
                    3 => HeadingLevel::H3,
                    other => {
                        return Err(BlockError::Invalid {
                            tag: tag.to_string(),
                            message: format!("heading level must be 2 or 3, got {other}"),
                        })
                    }
                };
                Self::Heading { level, text, id }
            }
            RawBlock::Image(image) => Self::Image(image),
            RawBlock::Portrait(image) => Self::Portrait(image),
            RawBlock::ImageGrid { cols, images } => {
                let columns = cols.unwrap_or(default_columns);
                if columns == 0 {
                    return Err(BlockError::Invalid {
                        tag: tag.to_string(),
                        message: "image grid needs at least one column".to_string(),
                    });
                }
                Self::ImageGrid { columns, images }
            }
            RawBlock::ImageRow { images } => Self::ImageRow { images },
            RawBlock::BulletList { items } => Self::BulletList { items },
            RawBlock::VideoEmbed { src, title } => Self::VideoEmbed { src, title },
            RawBlock::RiskWarning { title, text } => Self::RiskWarning { title, text },
            RawBlock::InlineCta { text, href } => Self::InlineCta { text, href },
            RawBlock::ButtonOutline { text, href } => Self::ButtonOutline { text, href },
            RawBlock::ClearFloat => Self::ClearFloat,
        };

        Ok(block)
    }

    /// Decode a sequence of blocks, failing on the first bad one.
    pub fn decode_all(values: &[Value], default_columns: u32) -> Result<Vec<Self>, BlockError> {
        values
            .iter()
            .map(|v| Self::decode(v, default_columns))
            .collect()
    }

    /// Turn a plain paragraph into a raw one when its text carries inline markup.
    ///
    /// Update posts are extracted from existing HTML, so their paragraphs keep
    /// links and emphasis that must not be escaped a second time.
    pub fn promote_inline_markup(self) -> Self {
        match self {
            Self::Paragraph { text } if has_inline_markup(&text) => {
                Self::ParagraphHtml { html: text }
            }
            other => other,
        }
    }
}

/// Whether `text` contains an inline element or an entity reference.
fn has_inline_markup(text: &str) -> bool {
    const INLINE_TAGS: &[&str] = &["a", "strong", "em", "b", "i", "br", "span", "code"];

    let lower = text.to_ascii_lowercase();
    let tag_found = INLINE_TAGS.iter().any(|tag| {
        [format!("<{tag}>"), format!("<{tag} "), format!("</{tag}>"), format!("<{tag}/")]
            .iter()
            .any(|needle| lower.contains(needle.as_str()))
    });

    tag_found || lower.contains("&amp;") || lower.contains("&nbsp;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_legacy_tags() {
        let block = ContentBlock::decode(&json!({"type": "p", "text": "Hi"}), 3).unwrap();
        assert_eq!(block, ContentBlock::Paragraph { text: "Hi".into() });

        let block = ContentBlock::decode(&json!({"type": "h2", "text": "Why"}), 3).unwrap();
        assert_eq!(
            block,
            ContentBlock::Heading {
                level: HeadingLevel::H2,
                text: "Why".into(),
                id: None
            }
        );

        let block = ContentBlock::decode(&json!({"type": "clear"}), 3).unwrap();
        assert_eq!(block, ContentBlock::ClearFloat);
    }

    #[test]
    fn decodes_descriptive_tags() {
        let block = ContentBlock::decode(
            &json!({"type": "heading", "level": 3, "text": "Details"}),
            3,
        )
        .unwrap();
        assert!(matches!(
            block,
            ContentBlock::Heading {
                level: HeadingLevel::H3,
                ..
            }
        ));

        let block = ContentBlock::decode(
            &json!({"type": "bullet_list", "items": ["one", "two"]}),
            3,
        )
        .unwrap();
        assert_eq!(
            block,
            ContentBlock::BulletList {
                items: vec!["one".into(), "two".into()]
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let err = ContentBlock::decode(&json!({"type": "mystery", "text": "?"}), 3).unwrap_err();
        assert_eq!(
            err,
            BlockError::Unknown {
                tag: "mystery".into()
            }
        );
    }

    #[test]
    fn rejects_missing_type() {
        let err = ContentBlock::decode(&json!({"text": "?"}), 3).unwrap_err();
        assert_eq!(err, BlockError::MissingType);
    }

    #[test]
    fn rejects_bad_heading_level() {
        let err = ContentBlock::decode(&json!({"type": "heading", "level": 1, "text": "x"}), 3)
            .unwrap_err();
        assert!(matches!(err, BlockError::Invalid { .. }));
    }

    #[test]
    fn image_requires_alt_attribute_field() {
        let err = ContentBlock::decode(&json!({"type": "img", "src": "a.png"}), 3).unwrap_err();
        assert!(matches!(err, BlockError::Invalid { .. }));

        let block =
            ContentBlock::decode(&json!({"type": "img", "src": "a.png", "alt": ""}), 3).unwrap();
        assert!(matches!(block, ContentBlock::Image(Image { ref alt, .. }) if alt.is_empty()));
    }

    #[test]
    fn grid_uses_default_columns() {
        let grid = json!({"type": "img_grid", "images": [{"src": "a.png", "alt": "a"}]});

        let block = ContentBlock::decode(&grid, 2).unwrap();
        assert!(matches!(block, ContentBlock::ImageGrid { columns: 2, .. }));

        let grid = json!({"type": "img_grid", "cols": 4, "images": []});
        let block = ContentBlock::decode(&grid, 2).unwrap();
        assert!(matches!(block, ContentBlock::ImageGrid { columns: 4, .. }));
    }

    #[test]
    fn promotes_paragraphs_with_links() {
        let block = ContentBlock::Paragraph {
            text: "See <a href=\"x.html\">this</a>".into(),
        };
        assert!(matches!(
            block.promote_inline_markup(),
            ContentBlock::ParagraphHtml { .. }
        ));

        let block = ContentBlock::Paragraph {
            text: "5 < 6 and a <b".into(),
        };
        assert!(matches!(
            block.promote_inline_markup(),
            ContentBlock::Paragraph { .. }
        ));
    }
}
