//! Initialize a site configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(root: &Path, config: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing polyglot...");

    let config_path = root.join(config);
    if config_path.exists() && !yes {
        tracing::warn!("{} already exists. Use --yes to overwrite.", config_path.display());
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    let translations = root.join(super::TRANSLATIONS_DIR);
    if !translations.exists() {
        fs::create_dir_all(&translations).context("Failed to create translations directory")?;
        tracing::info!("Created {}", translations.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'polyglot build' to generate the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Polyglot Configuration

[site]
# Appended to page titles
name = "SocialTradingVlog"

# Byline and structured-data publisher
publisher = "Social Trading Vlog"

base_url = "https://socialtradingvlog.com"
source_language = "en"
cta_url = "https://etoro.tw/4tEsDF4"
author = "Tom"
copyright = "2026 SocialTradingVlog.com"
contact_form_action = "https://formspree.io/f/FORM_ID_HERE"

[paths]
# Translation documents
translations = "tools/translations"

# Site root; source pages land here, translations under /{lang}/
output = "."

# Replaces the built-in UI string table
# ui_strings = "tools/ui_strings.json"

[[articles]]
id = "etoro-review"
slug = "etoro-review"
prefix = "etoro-review"
cta_url = "https://etoro.tw/4cuYCBg"
label = "eToro Review 2026"

[[backbone]]
id = "social-trading"
slug = "social-trading"

[[backbone]]
id = "copy-trading"
slug = "copy-trading"

[[backbone]]
id = "about"
slug = "about"

[[backbone]]
id = "copy-trading-returns"
slug = "copy-trading-returns"

[[backbone]]
id = "taking-profits"
slug = "taking-profits"
"#;
