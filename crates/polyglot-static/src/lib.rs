//! Static page generator for the multilingual site.
//!
//! Plans every page and language variant up front, renders content blocks,
//! resolves hreflang links and writes complete HTML documents.

pub mod assemble;
pub mod builder;
pub mod error;
pub mod hreflang;
pub mod html;
pub mod render;
pub mod route;
pub mod schema;
pub mod site;
pub mod templates;

pub use assemble::{Assembler, PageInput};
pub use builder::{BuildConfig, BuildReport, Selection, SiteBuilder};
pub use error::{BuildError, PolicyError, VariantError};
pub use hreflang::HreflangBlock;
pub use render::{BlockRenderer, RenderedBody, TocEntry};
pub use route::Route;
pub use site::{ArticleConfig, BackboneConfig, LogicalPage, SiteConfig, SitePlan};
pub use templates::TemplateEngine;
