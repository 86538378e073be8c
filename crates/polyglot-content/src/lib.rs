//! Translation documents, content blocks and UI strings.
//!
//! This crate loads the per-language JSON documents that describe every page of
//! the site, decodes their body blocks strictly, and exposes the read-only UI
//! string table shared by all page generators.

pub mod block;
pub mod language;
pub mod page;
pub mod slug;
pub mod store;
pub mod ui;
pub mod variant;

pub use block::{BlockError, ContentBlock, HeadingLevel, Image, LinkedImage};
pub use language::{LanguageCode, LanguageError};
pub use page::{PageKey, PageKind};
pub use slug::{slugify, AnchorSet};
pub use store::{
    SidebarLink, SourceExtract, StoreConfig, StoreError, TranslationStore, Variants, CONTACT_PAGE_ID,
    FAQ_PAGE_ID,
};
pub use ui::{UiError, UiKey, UiStrings};
pub use variant::{ContactForm, ContentError, FaqEntry, PageVariant, SidebarOverrides};
