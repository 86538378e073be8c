//! Filesystem-backed translation store.
//!
//! Scans the translations directory once and decodes every document it
//! recognizes:
//!
//! - `{article_prefix}_{lang}.json`: one article in one language
//! - `backbone_pages_{lang}.json`: every backbone page in one language, keyed by page id
//! - `updates_faq_contact_{lang}.json`: `{"updates": {id: variant}, "faq": variant, "contact": variant}`
//! - `{page_id}.json`: extracted source-language extras (video embed, sidebar links)
//!
//! Malformed JSON is fatal. A variant that fails to decode is kept as an error
//! so the generator can report it and carry on with the others.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::language::LanguageCode;
use crate::page::{PageKey, PageKind};
use crate::variant::{ContentError, PageVariant};

const BACKBONE_PREFIX: &str = "backbone_pages_";
const BUNDLE_PREFIX: &str = "updates_faq_contact_";

/// Id of the single FAQ page.
pub const FAQ_PAGE_ID: &str = "faq";
/// Id of the single contact page.
pub const CONTACT_PAGE_ID: &str = "contact";

/// What the store needs to know before scanning.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the translation documents
    pub dir: PathBuf,
    /// The source language
    pub source: LanguageCode,
    /// `(page id, file prefix)` for every configured article
    pub articles: Vec<(String, String)>,
}

/// A prev/next link shown in an update's sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarLink {
    pub href: String,
    pub text: String,
}

/// Source-language extras extracted from an existing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceExtract {
    /// File name of the source-language page, e.g. `some-update.html`
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub video_embed_src: Option<String>,
    #[serde(default)]
    pub video_embed_title: Option<String>,
    #[serde(default)]
    pub sidebar_links: Vec<SidebarLink>,
}

/// Errors that stop the store from loading.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Translations directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unrecognized file name {path}: {message}")]
    BadFileName { path: String, message: String },
}

/// Decoded variants of one page, by language.
pub type Variants = BTreeMap<LanguageCode, Result<PageVariant, ContentError>>;

#[derive(Debug, Deserialize)]
struct Bundle {
    #[serde(default)]
    updates: Map<String, Value>,
    #[serde(default)]
    faq: Option<Value>,
    #[serde(default)]
    contact: Option<Value>,
}

/// All translation documents, decoded and indexed by page.
#[derive(Debug)]
pub struct TranslationStore {
    source: LanguageCode,
    pages: HashMap<PageKey, Variants>,
    update_order: Vec<String>,
    extracts: HashMap<String, SourceExtract>,
    documents: usize,
}

impl TranslationStore {
    /// Scan `config.dir` and load every recognized document.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if !config.dir.is_dir() {
            return Err(StoreError::DirectoryNotFound(config.dir.display().to_string()));
        }

        let mut store = Self {
            source: config.source.clone(),
            pages: HashMap::new(),
            update_order: Vec::new(),
            extracts: HashMap::new(),
            documents: 0,
        };
        let mut bundles = Vec::new();

        for entry in WalkDir::new(&config.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| StoreError::Read {
                path: config.dir.display().to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            if let Some(code) = stem.strip_prefix(BACKBONE_PREFIX) {
                let lang = parse_file_language(path, code)?;
                store.load_backbone(path, lang)?;
            } else if let Some(code) = stem.strip_prefix(BUNDLE_PREFIX) {
                let lang = parse_file_language(path, code)?;
                // Source bundles first so update ids follow the source document order.
                bundles.push((lang, path.to_path_buf()));
            } else if let Some((id, lang)) = match_article(&config.articles, stem) {
                let value = read_json(path)?;
                store.insert(PageKey::new(PageKind::Article, id), lang, &value);
                store.documents += 1;
            } else {
                store.load_extract(path, stem)?;
            }
        }

        bundles.sort_by_key(|(lang, _)| *lang != store.source);
        for (lang, path) in bundles {
            store.load_bundle(&path, lang)?;
        }

        tracing::info!(
            "Loaded {} translation documents ({} pages, {} extracts) from {}",
            store.documents,
            store.pages.len(),
            store.extracts.len(),
            config.dir.display()
        );

        Ok(store)
    }

    /// The source language.
    pub fn source(&self) -> &LanguageCode {
        &self.source
    }

    /// Languages in which `key` decoded successfully, source included.
    pub fn available_languages(&self, key: &PageKey) -> BTreeSet<LanguageCode> {
        self.pages
            .get(key)
            .map(|variants| {
                variants
                    .iter()
                    .filter(|(_, v)| v.is_ok())
                    .map(|(lang, _)| lang.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The decoded variant of `key` in `lang`, if present and valid.
    pub fn load(&self, key: &PageKey, lang: &LanguageCode) -> Option<&PageVariant> {
        self.pages
            .get(key)
            .and_then(|variants| variants.get(lang))
            .and_then(|v| v.as_ref().ok())
    }

    /// Every variant of `key`, including the ones that failed to decode.
    pub fn variants(&self, key: &PageKey) -> Option<&Variants> {
        self.pages.get(key)
    }

    /// Update post ids in document order.
    pub fn update_ids(&self) -> &[String] {
        &self.update_order
    }

    /// Extracted source-language extras for `page_id`.
    pub fn extract(&self, page_id: &str) -> Option<&SourceExtract> {
        self.extracts.get(page_id)
    }

    fn insert(&mut self, key: PageKey, lang: LanguageCode, value: &Value) {
        let decoded = PageVariant::decode(key.kind, lang.clone(), value);
        if let Err(e) = &decoded {
            tracing::debug!("Variant {}/{} failed to decode: {}", lang, key, e);
        }

        let variants = self.pages.entry(key.clone()).or_default();
        if variants.insert(lang.clone(), decoded).is_some() {
            tracing::warn!("Duplicate variant {}/{}; keeping the last one read", lang, key);
        }
    }

    fn load_backbone(&mut self, path: &Path, lang: LanguageCode) -> Result<(), StoreError> {
        let pages: Map<String, Value> = parse_json(path, read_json(path)?)?;

        for (id, value) in &pages {
            self.insert(PageKey::new(PageKind::Backbone, id.as_str()), lang.clone(), value);
        }
        self.documents += 1;

        Ok(())
    }

    fn load_bundle(&mut self, path: &Path, lang: LanguageCode) -> Result<(), StoreError> {
        let bundle: Bundle = parse_json(path, read_json(path)?)?;

        for (id, value) in &bundle.updates {
            if !self.update_order.contains(id) {
                self.update_order.push(id.clone());
            }
            self.insert(PageKey::new(PageKind::Update, id.as_str()), lang.clone(), value);
        }
        if let Some(faq) = &bundle.faq {
            self.insert(PageKey::new(PageKind::Faq, FAQ_PAGE_ID), lang.clone(), faq);
        }
        if let Some(contact) = &bundle.contact {
            self.insert(PageKey::new(PageKind::Contact, CONTACT_PAGE_ID), lang, contact);
        }
        self.documents += 1;

        Ok(())
    }

    fn load_extract(&mut self, path: &Path, stem: &str) -> Result<(), StoreError> {
        let value = read_json(path)?;
        if !value.is_object() {
            tracing::debug!("Ignoring {} (not a page extract)", path.display());
            return Ok(());
        }

        let extract: SourceExtract = parse_json(path, value)?;
        self.extracts.insert(stem.to_string(), extract);

        Ok(())
    }
}

/// Find the configured article whose prefix names this file.
fn match_article(articles: &[(String, String)], stem: &str) -> Option<(String, LanguageCode)> {
    articles
        .iter()
        .filter_map(|(id, prefix)| {
            let code = stem.strip_prefix(prefix.as_str())?.strip_prefix('_')?;
            let lang = LanguageCode::parse(code).ok()?;
            Some((prefix.len(), id.clone(), lang))
        })
        .max_by_key(|(len, _, _)| *len)
        .map(|(_, id, lang)| (id, lang))
}

fn parse_file_language(path: &Path, code: &str) -> Result<LanguageCode, StoreError> {
    LanguageCode::parse(code).map_err(|e| StoreError::BadFileName {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn read_json(path: &Path) -> Result<Value, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
