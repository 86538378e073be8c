//! Site generation commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use polyglot_content::LanguageCode;
use polyglot_static::site::ANALYTICS_ID;
use polyglot_static::{
    ArticleConfig, BackboneConfig, BuildConfig, Selection, SiteBuilder, SiteConfig,
};

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    paths: PathsSection,
    /// Replaces the built-in article list when present
    articles: Option<Vec<ArticleEntry>>,
    /// Replaces the built-in backbone list when present
    backbone: Option<Vec<BackboneEntry>>,
}

/// Overrides for the built-in site settings.
#[derive(Debug, Deserialize, Default)]
struct SiteSection {
    name: Option<String>,
    publisher: Option<String>,
    base_url: Option<String>,
    source_language: Option<LanguageCode>,
    cta_url: Option<String>,
    author: Option<String>,
    copyright: Option<String>,
    contact_form_action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PathsSection {
    #[serde(default = "default_translations")]
    translations: PathBuf,
    #[serde(default = "default_output")]
    output: PathBuf,
    ui_strings: Option<PathBuf>,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            translations: default_translations(),
            output: default_output(),
            ui_strings: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArticleEntry {
    id: String,
    slug: String,
    prefix: Option<String>,
    cta_url: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BackboneEntry {
    id: String,
    slug: String,
}

fn default_translations() -> PathBuf {
    PathBuf::from(super::TRANSLATIONS_DIR)
}
fn default_output() -> PathBuf {
    PathBuf::from(".")
}

impl ConfigFile {
    /// Resolve against `root` and merge onto the built-in site.
    fn into_build_config(self, root: &Path) -> BuildConfig {
        let defaults = SiteConfig::default();
        let site = self.site;

        let articles = match self.articles {
            Some(entries) => entries
                .into_iter()
                .map(|entry| ArticleConfig {
                    prefix: entry.prefix.unwrap_or_else(|| entry.id.clone()),
                    id: entry.id,
                    slug: entry.slug,
                    cta_url: entry.cta_url,
                    label: entry.label,
                })
                .collect(),
            None => defaults.articles,
        };

        let backbone = match self.backbone {
            Some(entries) => entries
                .into_iter()
                .map(|entry| BackboneConfig {
                    id: entry.id,
                    slug: entry.slug,
                })
                .collect(),
            None => defaults.backbone,
        };

        BuildConfig {
            site: SiteConfig {
                name: site.name.unwrap_or(defaults.name),
                publisher: site.publisher.unwrap_or(defaults.publisher),
                base_url: site.base_url.unwrap_or(defaults.base_url),
                source_language: site.source_language.unwrap_or(defaults.source_language),
                cta_url: site.cta_url.unwrap_or(defaults.cta_url),
                author: site.author.unwrap_or(defaults.author),
                copyright: site.copyright.unwrap_or(defaults.copyright),
                contact_form_action: site
                    .contact_form_action
                    .unwrap_or(defaults.contact_form_action),
                analytics_id: ANALYTICS_ID.to_string(),
                articles,
                backbone,
            },
            translations_dir: root.join(self.paths.translations),
            output_dir: root.join(self.paths.output),
            ui_strings: self.paths.ui_strings.map(|path| root.join(path)),
            ..BuildConfig::default()
        }
    }
}

/// Load configuration from site.toml if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::info!("No {} found, using built-in site settings", path.display());
    Ok(ConfigFile::default())
}

/// Run a generation command. Returns whether every variant succeeded.
pub fn run(root: &Path, config: &Path, selection: Selection, force: bool) -> Result<bool> {
    tracing::info!("Generating pages...");

    let file_config = load_config(&root.join(config))?;

    let mut build = file_config.into_build_config(root);
    build.force = force;
    build.selection = selection;

    let report = SiteBuilder::new(build)?.build()?;

    tracing::info!(
        "Wrote {} pages ({} skipped, {} failed) in {}ms",
        report.written,
        report.skipped,
        report.failed,
        report.duration_ms
    );

    tracing::info!("Output: {}", report.output_dir.display());

    Ok(report.is_success())
}
