//! Static site builder.
//!
//! Generation runs one page kind at a time, in a fixed order, and one variant
//! at a time within each page. Every variant ends in exactly one log line:
//!
//! - `WROTE <path>`
//! - `SKIP <path> (exists)`
//! - `SKIP <lang>/<page> (no translation)`
//! - `ERROR <lang>/<page>: <reason>`

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polyglot_content::{
    LanguageCode, PageKind, StoreConfig, TranslationStore, UiStrings,
};

use crate::assemble::{Assembler, PageInput};
use crate::error::{BuildError, VariantError};
use crate::site::{LogicalPage, SiteConfig, SitePlan};
use crate::templates::TemplateEngine;

/// Which variants to generate. Empty filters select everything.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub lang: Option<LanguageCode>,
    /// Page id
    pub page: Option<String>,
    pub kinds: Vec<PageKind>,
}

impl Selection {
    fn includes_kind(&self, kind: PageKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    fn includes_page(&self, id: &str) -> bool {
        self.page.as_deref().is_none_or(|page| page == id)
    }

    fn includes_lang(&self, lang: &LanguageCode) -> bool {
        self.lang.as_ref().is_none_or(|l| l == lang)
    }
}

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub site: SiteConfig,

    /// Translation documents directory
    pub translations_dir: PathBuf,

    /// Output directory (the site root)
    pub output_dir: PathBuf,

    /// UI string table; the built-in table when unset
    pub ui_strings: Option<PathBuf>,

    /// Overwrite existing files
    pub force: bool,

    pub selection: Selection,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            translations_dir: PathBuf::from("translations"),
            output_dir: PathBuf::from("."),
            ui_strings: None,
            force: false,
            selection: Selection::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of files written
    pub written: usize,

    /// Variants skipped because the file exists or no translation exists
    pub skipped: usize,

    /// Variants that failed
    pub failed: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,

    /// Written files, relative to the output directory
    pub written_files: Vec<PathBuf>,
}

impl BuildReport {
    /// Whether every selected variant was written or skipped.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

enum Emitted {
    Written(PathBuf),
    Exists(PathBuf),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    ui: UiStrings,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a builder, loading the UI strings and templates.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let source = config.site.source_language.clone();
        let ui = match &config.ui_strings {
            Some(path) => UiStrings::load(source, path)?,
            None => UiStrings::builtin(source)?,
        };
        let templates = TemplateEngine::new().map_err(|e| BuildError::Template(e.to_string()))?;

        Ok(Self {
            config,
            ui,
            templates,
        })
    }

    /// Build the selected pages.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let output_dir = &self.config.output_dir;

        fs::create_dir_all(output_dir).map_err(|e| BuildError::OutputDir {
            path: output_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let site = &self.config.site;
        let store = TranslationStore::open(&StoreConfig {
            dir: self.config.translations_dir.clone(),
            source: site.source_language.clone(),
            articles: site
                .articles
                .iter()
                .map(|a| (a.id.clone(), a.prefix.clone()))
                .collect(),
        })?;
        let assembler = Assembler::new(site, &self.ui, &self.templates);
        let plan = SitePlan::build(site, &store, |route, variant, cta_url| {
            assembler.check(route, variant, cta_url)
        })?;

        let mut report = BuildReport {
            output_dir: output_dir.clone(),
            ..BuildReport::default()
        };

        for kind in PageKind::ALL {
            if !self.config.selection.includes_kind(kind) {
                continue;
            }
            self.drive(kind, &plan, &store, &assembler, &mut report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        Ok(report)
    }

    /// Generate every selected variant of every page of one kind.
    fn drive(
        &self,
        kind: PageKind,
        plan: &SitePlan<'_>,
        store: &TranslationStore,
        assembler: &Assembler<'_>,
        report: &mut BuildReport,
    ) {
        let selection = &self.config.selection;
        let source = &self.config.site.source_language;

        for page in plan.pages_of(kind) {
            if !selection.includes_page(&page.key.id) {
                continue;
            }

            let languages = std::iter::once(source)
                .chain(plan.languages.iter().filter(|lang| *lang != source));

            for lang in languages {
                if !selection.includes_lang(lang) {
                    continue;
                }
                self.generate(page, lang, store, assembler, report);
            }
        }
    }

    fn generate(
        &self,
        page: &LogicalPage<'_>,
        lang: &LanguageCode,
        store: &TranslationStore,
        assembler: &Assembler<'_>,
        report: &mut BuildReport,
    ) {
        let id = &page.key.id;

        let Some(planned) = page.variant(lang) else {
            tracing::info!("SKIP {}/{} (no translation)", lang, id);
            report.skipped += 1;
            return;
        };

        let result = planned.ready().map_err(ToString::to_string).and_then(|ready| {
            let input = PageInput {
                page,
                route: ready.route,
                variant: ready.variant,
                extract: match page.key.kind {
                    PageKind::Update => store.extract(id),
                    _ => None,
                },
            };
            self.emit(assembler, input).map_err(|e| e.to_string())
        });

        match result {
            Ok(Emitted::Written(path)) => {
                tracing::info!("WROTE {}", path.display());
                report.written += 1;
                report.written_files.push(path);
            }
            Ok(Emitted::Exists(path)) => {
                tracing::info!("SKIP {} (exists)", path.display());
                report.skipped += 1;
            }
            Err(reason) => {
                tracing::error!("ERROR {}/{}: {}", lang, id, reason);
                report.failed += 1;
            }
        }
    }

    fn emit(&self, assembler: &Assembler<'_>, input: PageInput<'_>) -> Result<Emitted, VariantError> {
        let relative = input.route.output_file();
        let path = self.config.output_dir.join(&relative);

        if path.exists() && !self.config.force {
            return Ok(Emitted::Exists(relative));
        }

        let html = assembler.assemble(input)?;
        write_atomic(&path, &html)?;

        Ok(Emitted::Written(relative))
    }
}

/// Write `contents` to a sibling temporary file, then rename it into place.
fn write_atomic(path: &Path, contents: &str) -> Result<(), VariantError> {
    let fail = |e: std::io::Error| VariantError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(fail)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(fail(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn selection_filters() {
        let selection = Selection {
            lang: Some("es".parse().unwrap()),
            page: Some("demo".to_string()),
            kinds: vec![PageKind::Article],
        };

        assert!(selection.includes_kind(PageKind::Article));
        assert!(!selection.includes_kind(PageKind::Faq));
        assert!(selection.includes_page("demo"));
        assert!(!selection.includes_page("other"));
        assert!(selection.includes_lang(&"es".parse().unwrap()));
        assert!(!selection.includes_lang(&"fr".parse().unwrap()));

        let all = Selection::default();
        assert!(all.includes_kind(PageKind::Contact));
        assert!(all.includes_page("anything"));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("es/demo/index.html");

        write_atomic(&path, "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        assert!(!dir.path().join("es/demo/index.html.tmp").exists());
    }

    #[test]
    fn missing_translations_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let builder = SiteBuilder::new(BuildConfig {
            translations_dir: dir.path().join("nope"),
            output_dir: dir.path().join("out"),
            ..BuildConfig::default()
        })
        .unwrap();

        assert!(matches!(builder.build(), Err(BuildError::Store(_))));
    }
}
