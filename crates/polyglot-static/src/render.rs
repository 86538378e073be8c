//! Block renderer: content blocks to HTML fragments.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use polyglot_content::{slugify, AnchorSet, ContentBlock, HeadingLevel, Image, LinkedImage};

use crate::html::Element;

/// Ids used by the page chrome that headings must never take.
pub const RESERVED_ANCHORS: &[&str] = &[
    "nav-hamburger",
    "nav-drawer",
    "etoro-cta",
    "name",
    "email",
    "message",
];

const VIDEO_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
const IMAGE_STYLE: &str = "max-width:100%;height:auto;border-radius:8px;margin:24px 0;display:block;";
const GRID_IMAGE_STYLE: &str = "width:100%;height:auto;border-radius:8px;object-fit:cover;";
const PORTRAIT_CLASS: &str = "about-portrait lb-trigger";

static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid")
});

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
}

/// A rendered page body.
#[derive(Debug, Clone, Default)]
pub struct RenderedBody {
    pub html: String,
    /// Every level-2 heading, in document order
    pub toc: Vec<TocEntry>,
}

/// Renders content blocks for one page.
///
/// `asset_prefix` is prepended to every site-local `src` and `href`; the
/// risk-warning strings fill in `risk_warning` blocks that omit them.
#[derive(Debug, Clone)]
pub struct BlockRenderer<'a> {
    asset_prefix: &'a str,
    risk_title: &'a str,
    risk_text: &'a str,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(asset_prefix: &'a str, risk_title: &'a str, risk_text: &'a str) -> Self {
        Self {
            asset_prefix,
            risk_title,
            risk_text,
        }
    }

    /// Render a single block.
    ///
    /// Level-2 headings get their explicit id or the slug of their text.
    pub fn render(&self, block: &ContentBlock) -> String {
        let id = match block {
            ContentBlock::Heading {
                level: HeadingLevel::H2,
                text,
                id,
            } => Some(id.clone().unwrap_or_else(|| slugify(text))),
            ContentBlock::Heading { id, .. } => id.clone(),
            _ => None,
        };
        self.render_with_id(block, id.as_deref())
    }

    /// Render a whole body, giving every heading a unique anchor.
    pub fn render_body(&self, blocks: &[ContentBlock]) -> RenderedBody {
        let mut anchors = AnchorSet::with_reserved(RESERVED_ANCHORS.iter().copied());
        let mut toc = Vec::new();
        let mut parts = Vec::with_capacity(blocks.len());

        for block in blocks {
            let id = match block {
                ContentBlock::Heading { level, text, id } => {
                    let anchor = match id {
                        Some(id) => Some(anchors.claim_id(id)),
                        None if *level == HeadingLevel::H2 => Some(anchors.claim(text)),
                        None => None,
                    };
                    if let (HeadingLevel::H2, Some(anchor)) = (level, &anchor) {
                        toc.push(TocEntry {
                            title: text.clone(),
                            id: anchor.clone(),
                        });
                    }
                    anchor
                }
                _ => None,
            };
            parts.push(self.render_with_id(block, id.as_deref()));
        }

        RenderedBody {
            html: parts.join("\n"),
            toc,
        }
    }

    fn render_with_id(&self, block: &ContentBlock, id: Option<&str>) -> String {
        let element = match block {
            ContentBlock::Paragraph { text } => Element::new("p").text(text),
            ContentBlock::ParagraphHtml { html } => Element::new("p").raw(html),
            ContentBlock::Note { text } => Element::new("p").attr("class", "toms-note").text(text),
            ContentBlock::Heading { level, text, .. } => {
                Element::new(level.tag()).attr_opt("id", id).text(text)
            }
            ContentBlock::Image(image) => self
                .image(image)
                .attr("style", IMAGE_STYLE)
                .attr("loading", "lazy")
                .attr_opt("class", image.class.as_deref()),
            ContentBlock::Portrait(image) => self
                .image(image)
                .attr("class", image.class.as_deref().unwrap_or(PORTRAIT_CLASS))
                .attr("loading", "lazy"),
            ContentBlock::ImageGrid { columns, images } => Element::new("div")
                .attr(
                    "style",
                    format!("display:grid;grid-template-columns:repeat({columns},1fr);gap:12px;margin:24px 0;"),
                )
                .children(images.iter().map(|image| {
                    self.image(image)
                        .attr("style", GRID_IMAGE_STYLE)
                        .attr("loading", "lazy")
                })),
            ContentBlock::ImageRow { images } => Element::new("div")
                .attr("class", "about-img-row")
                .children(images.iter().map(|image| self.linked_image(image))),
            ContentBlock::BulletList { items } => Element::new("ul")
                .children(items.iter().map(|item| Element::new("li").text(item))),
            ContentBlock::VideoEmbed { src, title } => self.video(src, title),
            ContentBlock::RiskWarning { title, text } => risk_warning(
                title.as_deref().unwrap_or(self.risk_title),
                text.as_deref().unwrap_or(self.risk_text),
            ),
            ContentBlock::InlineCta { text, href } => Element::new("div")
                .attr("class", "inline-cta")
                .child(self.button(text, href, "btn btn-primary")),
            ContentBlock::ButtonOutline { text, href } => self.button(text, href, "btn btn-outline"),
            ContentBlock::ClearFloat => Element::new("div").attr("style", "clear:both;"),
        };

        element.render()
    }

    /// An embedded video iframe.
    pub fn video(&self, src: &str, title: &str) -> Element {
        Element::new("div").attr("class", "video-embed").child(
            Element::new("iframe")
                .attr("src", self.resolve(src))
                .attr("title", title)
                .attr("allow", VIDEO_ALLOW)
                .flag("allowfullscreen")
                .attr("loading", "lazy"),
        )
    }

    /// Prefix a site-local reference; pass absolute ones through.
    pub fn resolve(&self, href: &str) -> String {
        if href.is_empty()
            || href.starts_with('/')
            || href.starts_with('#')
            || SCHEME.is_match(href)
        {
            href.to_string()
        } else {
            format!("{}{}", self.asset_prefix, href)
        }
    }

    fn image(&self, image: &Image) -> Element {
        Element::void("img")
            .attr("src", self.resolve(&image.src))
            .attr("alt", image.alt.as_str())
    }

    fn linked_image(&self, image: &LinkedImage) -> Element {
        Element::new("a").attr("href", self.resolve(&image.href)).child(
            Element::void("img")
                .attr("src", self.resolve(&image.src))
                .attr("alt", image.alt.as_str())
                .attr("loading", "lazy"),
        )
    }

    fn button(&self, text: &str, href: &str, class: &str) -> Element {
        Element::new("a")
            .attr("href", self.resolve(href))
            .attr("class", class)
            .attr("target", "_blank")
            .attr("rel", "noopener sponsored")
            .text(text)
    }
}

/// A boxed warning with a bold title.
pub fn risk_warning(title: &str, text: &str) -> Element {
    Element::new("div")
        .attr("class", "risk-warning")
        .raw(format!("<strong>{}</strong> ", crate::html::escape(title)))
        .text(text)
}
