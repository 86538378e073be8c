//! Site configuration and the page plan.
//!
//! The plan is computed once per build, before anything is written. It fixes
//! the route of every variant, rejects colliding output paths and resolves the
//! hreflang block of every logical page, so each page links to exactly the
//! variants that will be generated.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use polyglot_content::{
    LanguageCode, PageKey, PageKind, PageVariant, TranslationStore, CONTACT_PAGE_ID, FAQ_PAGE_ID,
};

use crate::error::{BuildError, PolicyError, VariantError};
use crate::hreflang::HreflangBlock;
use crate::route::Route;

/// Analytics measurement id baked in at compile time.
pub const ANALYTICS_ID: &str = match option_env!("POLYGLOT_ANALYTICS_ID") {
    Some(id) => id,
    None => "G-XXXXXXXXXX",
};

/// A long-form article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleConfig {
    pub id: String,
    /// Source-language slug
    pub slug: String,
    /// Translation file prefix, `{prefix}_{lang}.json`
    pub prefix: String,
    /// Overrides the site-wide call-to-action URL
    pub cta_url: Option<String>,
    /// Label in the "more guides" sidebar
    pub label: Option<String>,
}

/// A backbone page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackboneConfig {
    pub id: String,
    /// Source-language slug, without `.html`
    pub slug: String,
}

/// Site-wide settings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Appended to generated titles
    pub name: String,
    /// Publisher name in bylines and schemas
    pub publisher: String,
    pub base_url: String,
    pub source_language: LanguageCode,
    /// Default call-to-action URL
    pub cta_url: String,
    pub author: String,
    pub copyright: String,
    pub contact_form_action: String,
    pub analytics_id: String,
    pub articles: Vec<ArticleConfig>,
    pub backbone: Vec<BackboneConfig>,
}

impl SiteConfig {
    /// The site root without a trailing slash.
    pub fn root_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Author profile URL.
    pub fn author_url(&self) -> String {
        format!("{}/about.html", self.root_url())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let backbone = [
            "social-trading",
            "copy-trading",
            "about",
            "copy-trading-returns",
            "taking-profits",
        ];

        Self {
            name: "SocialTradingVlog".to_string(),
            publisher: "Social Trading Vlog".to_string(),
            base_url: "https://socialtradingvlog.com".to_string(),
            source_language: LanguageCode::default(),
            cta_url: "https://etoro.tw/4tEsDF4".to_string(),
            author: "Tom".to_string(),
            copyright: "2026 SocialTradingVlog.com".to_string(),
            contact_form_action: "https://formspree.io/f/FORM_ID_HERE".to_string(),
            analytics_id: ANALYTICS_ID.to_string(),
            articles: vec![ArticleConfig {
                id: "etoro-review".to_string(),
                slug: "etoro-review".to_string(),
                prefix: "etoro-review".to_string(),
                cta_url: Some("https://etoro.tw/4cuYCBg".to_string()),
                label: Some("eToro Review 2026".to_string()),
            }],
            backbone: backbone
                .into_iter()
                .map(|id| BackboneConfig {
                    id: id.to_string(),
                    slug: id.to_string(),
                })
                .collect(),
        }
    }
}

/// A variant that is ready to be assembled.
#[derive(Debug, Clone, Copy)]
pub struct Ready<'a> {
    pub route: &'a Route,
    pub variant: &'a PageVariant,
}

/// The planned outcome for one language of a page.
#[derive(Debug)]
pub struct PlannedVariant<'a> {
    pub lang: LanguageCode,
    pub outcome: Result<(Route, &'a PageVariant), VariantError>,
}

impl PlannedVariant<'_> {
    /// The route and content, if the variant can be generated.
    pub fn ready(&self) -> Result<Ready<'_>, &VariantError> {
        match &self.outcome {
            Ok((route, variant)) => Ok(Ready {
                route,
                variant: *variant,
            }),
            Err(e) => Err(e),
        }
    }
}

/// One page and all of its language variants.
#[derive(Debug)]
pub struct LogicalPage<'a> {
    pub key: PageKey,
    /// Where the source-language page lives, whether or not it is generated
    pub source: Route,
    /// Variants in generation order: source first, then targets by code
    pub variants: Vec<PlannedVariant<'a>>,
    pub hreflang: HreflangBlock,
    pub cta_url: String,
}

impl LogicalPage<'_> {
    /// The planned variant for `lang`, if a document exists.
    pub fn variant(&self, lang: &LanguageCode) -> Option<&PlannedVariant<'_>> {
        self.variants.iter().find(|v| &v.lang == lang)
    }
}

/// Every page of the site, in generation order.
#[derive(Debug)]
pub struct SitePlan<'a> {
    pub pages: Vec<LogicalPage<'a>>,
    /// Every language with at least one document
    pub languages: BTreeSet<LanguageCode>,
}

/// Output paths claimed so far, with the variant that owns each.
#[derive(Debug, Default)]
struct Claims(HashMap<PathBuf, String>);

impl Claims {
    fn claim(&mut self, route: &Route, owner: String) -> Result<(), PolicyError> {
        let path = route.output_file();
        if let Some(existing) = self.0.get(&path) {
            return Err(PolicyError::Collision {
                path: path.display().to_string(),
                owner: existing.clone(),
            });
        }
        self.0.insert(path, owner);
        Ok(())
    }
}

impl<'a> SitePlan<'a> {
    /// Plan every configured page against the loaded translations.
    ///
    /// Source-language routes that collide stop the build. A target variant
    /// that cannot be generated is recorded as failed and left out of every
    /// hreflang block: an unusable slug, a colliding path, undecodable
    /// content, or anything `check` rejects.
    pub fn build<F>(site: &SiteConfig, store: &'a TranslationStore, check: F) -> Result<Self, BuildError>
    where
        F: Fn(&Route, &PageVariant, &str) -> Result<(), VariantError>,
    {
        let mut claims = Claims::default();
        let mut pages = Vec::new();
        let mut languages = BTreeSet::new();

        let mut entries: Vec<(PageKey, String, String)> = Vec::new();
        for article in &site.articles {
            let cta = article.cta_url.clone().unwrap_or_else(|| site.cta_url.clone());
            entries.push((PageKey::new(PageKind::Article, &article.id), article.slug.clone(), cta));
        }
        for page in &site.backbone {
            entries.push((PageKey::new(PageKind::Backbone, &page.id), page.slug.clone(), site.cta_url.clone()));
        }
        for id in store.update_ids() {
            let slug = update_source_slug(store, id);
            entries.push((PageKey::new(PageKind::Update, id), slug, site.cta_url.clone()));
        }
        for (kind, id) in [(PageKind::Faq, FAQ_PAGE_ID), (PageKind::Contact, CONTACT_PAGE_ID)] {
            let key = PageKey::new(kind, id);
            if store.variants(&key).is_some() {
                entries.push((key, id.to_string(), site.cta_url.clone()));
            }
        }

        for (key, slug, cta_url) in entries {
            let page = plan_page(site, store, &mut claims, &check, key, slug, cta_url)?;
            tracing::debug!(
                "{}: {} of {} variants usable",
                page.key,
                store.available_languages(&page.key).len(),
                page.variants.len()
            );
            languages.extend(page.variants.iter().map(|v| v.lang.clone()));
            pages.push(page);
        }

        tracing::debug!("Planned {} pages in {} languages", pages.len(), languages.len());

        Ok(Self { pages, languages })
    }

    /// Pages of one kind, in plan order.
    pub fn pages_of(&self, kind: PageKind) -> impl Iterator<Item = &LogicalPage<'a>> {
        self.pages.iter().filter(move |p| p.key.kind == kind)
    }
}

fn plan_page<'a>(
    site: &SiteConfig,
    store: &'a TranslationStore,
    claims: &mut Claims,
    check: &dyn Fn(&Route, &PageVariant, &str) -> Result<(), VariantError>,
    key: PageKey,
    slug: String,
    cta_url: String,
) -> Result<LogicalPage<'a>, BuildError> {
    let source_lang = &site.source_language;

    let source = Route::source(key.kind, slug)
        .map_err(|e| BuildError::Config(format!("{}: {}", key, e)))?;
    claims
        .claim(&source, format!("{}/{}", source_lang, key.id))
        .map_err(|e| BuildError::Config(format!("{}: {}", key, e)))?;

    let mut variants = Vec::new();
    let mut targets = BTreeMap::new();

    let documents = store.variants(&key);

    // Source first so it always wins its own path.
    if let Some(decoded) = documents.and_then(|d| d.get(source_lang)) {
        let outcome = decoded
            .as_ref()
            .map_err(|e| VariantError::Content(e.clone()))
            .and_then(|variant| {
                check(&source, variant, &cta_url)?;
                Ok((source.clone(), variant))
            });
        variants.push(PlannedVariant {
            lang: source_lang.clone(),
            outcome,
        });
    }

    for (lang, decoded) in documents
        .into_iter()
        .flatten()
        .filter(|(lang, _)| *lang != source_lang)
    {
        let outcome = decoded
            .as_ref()
            .map_err(|e| VariantError::Content(e.clone()))
            .and_then(|variant| {
                let route = Route::target(key.kind, lang.clone(), variant.slug.as_str())?;
                claims.claim(&route, format!("{}/{}", lang, key.id))?;
                check(&route, variant, &cta_url)?;
                Ok((route, variant))
            });

        if let Ok((route, _)) = &outcome {
            targets.insert(lang.clone(), route.url(&site.base_url));
        }
        variants.push(PlannedVariant {
            lang: lang.clone(),
            outcome,
        });
    }

    let hreflang = HreflangBlock::resolve(source_lang, &source.url(&site.base_url), &targets);

    Ok(LogicalPage {
        key,
        source,
        variants,
        hreflang,
        cta_url,
    })
}

/// Source slug of an update: the extracted page's file name, then the source
/// document's slug, then the page id.
fn update_source_slug(store: &TranslationStore, id: &str) -> String {
    let from_extract = store
        .extract(id)
        .and_then(|e| e.filename.as_deref())
        .and_then(|name| name.rsplit('/').next())
        .map(|name| name.strip_suffix(".html").unwrap_or(name))
        .filter(|name| !name.is_empty());

    let from_source = || {
        store
            .load(&PageKey::new(PageKind::Update, id), store.source())
            .map(|v| v.slug.as_str())
            .filter(|slug| !slug.is_empty())
    };

    from_extract.or_else(from_source).unwrap_or(id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use polyglot_content::{StoreConfig, UiError, UiKey};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn lang(code: &str) -> LanguageCode {
        code.parse().unwrap()
    }

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.com".to_string(),
            articles: vec![ArticleConfig {
                id: "demo".to_string(),
                slug: "demo".to_string(),
                prefix: "demo".to_string(),
                cta_url: Some("https://cta.example.com".to_string()),
                label: None,
            }],
            backbone: vec![BackboneConfig {
                id: "copy-trading".to_string(),
                slug: "copy-trading".to_string(),
            }],
            ..SiteConfig::default()
        }
    }

    fn article(slug: &str) -> String {
        format!(
            r#"{{"slug": "{slug}", "meta_description": "m", "h1": "H", "intro": "i", "body": [{{"type": "paragraph", "text": "x"}}]}}"#
        )
    }

    fn accept(_: &Route, _: &PageVariant, _: &str) -> Result<(), VariantError> {
        Ok(())
    }

    fn store(dir: &TempDir, site: &SiteConfig) -> TranslationStore {
        TranslationStore::open(&StoreConfig {
            dir: dir.path().to_path_buf(),
            source: site.source_language.clone(),
            articles: site
                .articles
                .iter()
                .map(|a| (a.id.clone(), a.prefix.clone()))
                .collect(),
        })
        .unwrap()
    }

    #[test]
    fn plans_articles_with_hreflang() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_en.json"), article("demo")).unwrap();
        fs::write(dir.path().join("demo_es.json"), article("demo-es")).unwrap();
        fs::write(dir.path().join("demo_fr.json"), article("demo-fr")).unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, accept).unwrap();

        let page = plan.pages_of(PageKind::Article).next().unwrap();
        assert_eq!(page.cta_url, "https://cta.example.com");
        let langs: Vec<&str> = page.variants.iter().map(|v| v.lang.as_str()).collect();
        assert_eq!(langs, ["en", "es", "fr"]);
        assert_eq!(page.hreflang.as_str().lines().count(), 4);
        assert!(page
            .hreflang
            .as_str()
            .contains(r#"hreflang="es" href="https://example.com/es/demo-es/""#));
        assert_eq!(plan.languages, BTreeSet::from([lang("en"), lang("es"), lang("fr")]));
    }

    #[test]
    fn colliding_target_is_excluded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_en.json"), article("demo")).unwrap();
        fs::write(dir.path().join("demo_es.json"), article("copy-trading")).unwrap();
        fs::write(
            dir.path().join("backbone_pages_es.json"),
            format!(r#"{{"copy-trading": {}}}"#, article("copy-trading")),
        )
        .unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, accept).unwrap();

        // The article is planned first and owns es/copy-trading/.
        let backbone = plan.pages_of(PageKind::Backbone).next().unwrap();
        let es = backbone.variant(&lang("es")).unwrap();
        assert!(matches!(
            es.outcome,
            Err(VariantError::Policy(PolicyError::Collision { .. }))
        ));
        assert!(!backbone.hreflang.as_str().contains("hreflang=\"es\""));
    }

    #[test]
    fn rejected_variant_is_left_out_of_hreflang() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_en.json"), article("demo")).unwrap();
        fs::write(dir.path().join("demo_de.json"), article("demo-de")).unwrap();
        fs::write(dir.path().join("demo_es.json"), article("demo-es")).unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, |route, variant, _| match route.lang {
            Some(ref lang) if lang.as_str() == "de" => Err(VariantError::Ui(UiError::MissingString {
                lang: variant.language.to_string(),
                key: UiKey::ContactSubmit,
            })),
            _ => Ok(()),
        })
        .unwrap();

        let page = plan.pages_of(PageKind::Article).next().unwrap();
        assert!(page.variant(&lang("de")).unwrap().ready().is_err());
        assert!(page.variant(&lang("es")).unwrap().ready().is_ok());
        assert!(!page.hreflang.as_str().contains(r#"hreflang="de""#));
        assert!(page.hreflang.as_str().contains(r#"hreflang="es""#));
    }

    #[test]
    fn bad_slug_is_a_variant_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_en.json"), article("demo")).unwrap();
        fs::write(dir.path().join("demo_de.json"), article("a/b")).unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, accept).unwrap();

        let page = plan.pages_of(PageKind::Article).next().unwrap();
        assert!(page.variant(&lang("de")).unwrap().ready().is_err());
        assert!(page.variant(&lang("en")).unwrap().ready().is_ok());
    }

    #[test]
    fn source_collision_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut site = site();
        site.backbone.push(BackboneConfig {
            id: "copy-again".to_string(),
            slug: "copy-trading".to_string(),
        });
        let store = store(&dir, &site);

        assert!(matches!(SitePlan::build(&site, &store, accept), Err(BuildError::Config(_))));
    }

    #[test]
    fn missing_source_document_keeps_source_url() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_es.json"), article("demo-es")).unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, accept).unwrap();

        let page = plan.pages_of(PageKind::Article).next().unwrap();
        assert!(page.variant(&lang("en")).is_none());
        assert!(page
            .hreflang
            .as_str()
            .contains(r#"hreflang="x-default" href="https://example.com/demo/""#));
    }

    #[test]
    fn update_slug_prefers_extracted_file_name() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("updates_faq_contact_en.json"),
            r#"{"updates": {"jan": {"slug": "ignored", "meta_description": "m", "h1": "Jan", "body": []}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("jan.json"), r#"{"filename": "updates/january-2020.html"}"#).unwrap();

        let site = site();
        let store = store(&dir, &site);
        let plan = SitePlan::build(&site, &store, accept).unwrap();

        let update = plan.pages_of(PageKind::Update).next().unwrap();
        assert_eq!(update.source.path(), "/updates/january-2020.html");
    }
}
