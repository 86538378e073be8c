//! The UI string table.
//!
//! Short chrome phrases (navigation labels, call-to-action text, risk warnings,
//! section headings) keyed by language. The table is loaded once and shared
//! read-only by every page generator.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::language::LanguageCode;

/// Built-in table shipped with the crate.
const BUILTIN_TABLE: &str = include_str!("../data/ui_strings.json");

/// The closed set of UI string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiKey {
    // Navigation
    SocialTrading,
    CopyTrading,
    Updates,
    Videos,
    About,
    Faq,
    TryEtoro,
    // Risk warnings
    RiskWarningLabel,
    RiskWarningBanner,
    RiskWarningFull,
    RiskWarningFooter,
    RiskWarningSidebar,
    ImportantReminder,
    ImportantReminderText,
    // Calls to action
    ReadyToTry,
    TomsAffiliate,
    ExploreEtoro,
    ReadyCtaInline,
    // Section headings
    InThisArticle,
    MoreGuides,
    MoreUpdates,
    BackToUpdates,
    FaqHeading,
    ByTom,
    BreadcrumbHome,
    // Guides
    GuideSocial,
    GuideCopy,
    GuideReturns,
    GuideScam,
    GuideProfits,
    GuideAllVideos,
    // Footer
    FooterBrand,
    FooterGuides,
    FooterSite,
    FooterUpdates,
    FooterAbout,
    FooterFaq,
    FooterContact,
    // Contact form
    ContactName,
    ContactEmail,
    ContactMessage,
    ContactSubmit,
    ContactSubject,
}

impl UiKey {
    /// Key name as written in the table file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SocialTrading => "social_trading",
            Self::CopyTrading => "copy_trading",
            Self::Updates => "updates",
            Self::Videos => "videos",
            Self::About => "about",
            Self::Faq => "faq",
            Self::TryEtoro => "try_etoro",
            Self::RiskWarningLabel => "risk_warning_label",
            Self::RiskWarningBanner => "risk_warning_banner",
            Self::RiskWarningFull => "risk_warning_full",
            Self::RiskWarningFooter => "risk_warning_footer",
            Self::RiskWarningSidebar => "risk_warning_sidebar",
            Self::ImportantReminder => "important_reminder",
            Self::ImportantReminderText => "important_reminder_text",
            Self::ReadyToTry => "ready_to_try",
            Self::TomsAffiliate => "toms_affiliate",
            Self::ExploreEtoro => "explore_etoro",
            Self::ReadyCtaInline => "ready_cta_inline",
            Self::InThisArticle => "in_this_article",
            Self::MoreGuides => "more_guides",
            Self::MoreUpdates => "more_updates",
            Self::BackToUpdates => "back_to_updates",
            Self::FaqHeading => "faq_heading",
            Self::ByTom => "by_tom",
            Self::BreadcrumbHome => "breadcrumb_home",
            Self::GuideSocial => "guide_social",
            Self::GuideCopy => "guide_copy",
            Self::GuideReturns => "guide_returns",
            Self::GuideScam => "guide_scam",
            Self::GuideProfits => "guide_profits",
            Self::GuideAllVideos => "guide_all_videos",
            Self::FooterBrand => "footer_brand",
            Self::FooterGuides => "footer_guides",
            Self::FooterSite => "footer_site",
            Self::FooterUpdates => "footer_updates",
            Self::FooterAbout => "footer_about",
            Self::FooterFaq => "footer_faq",
            Self::FooterContact => "footer_contact",
            Self::ContactName => "contact_name",
            Self::ContactEmail => "contact_email",
            Self::ContactMessage => "contact_message",
            Self::ContactSubmit => "contact_submit",
            Self::ContactSubject => "contact_subject",
        }
    }
}

impl fmt::Display for UiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the UI string table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    #[error("Missing UI string {key} for language {lang} (no fallback or default)")]
    MissingString { lang: String, key: UiKey },

    #[error("Failed to read UI strings from {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid UI string table: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct TableFile {
    languages: BTreeMap<LanguageCode, LanguageEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageEntry {
    #[serde(default)]
    rtl: bool,
    #[serde(default)]
    strings: HashMap<UiKey, String>,
}

/// Localized chrome strings with deterministic fallback.
#[derive(Debug)]
pub struct UiStrings {
    source: LanguageCode,
    languages: BTreeMap<LanguageCode, LanguageEntry>,
}

impl UiStrings {
    /// Load the table shipped with the crate.
    pub fn builtin(source: LanguageCode) -> Result<Self, UiError> {
        Self::from_json(source, BUILTIN_TABLE)
    }

    /// Load a table from a JSON file.
    pub fn load(source: LanguageCode, path: &Path) -> Result<Self, UiError> {
        let content = fs::read_to_string(path).map_err(|e| UiError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(source, &content)
    }

    /// Parse a table from JSON text.
    ///
    /// Keys outside the closed [`UiKey`] set are rejected.
    pub fn from_json(source: LanguageCode, json: &str) -> Result<Self, UiError> {
        let file: TableFile =
            serde_json::from_str(json).map_err(|e| UiError::Parse(e.to_string()))?;

        tracing::debug!(
            "Loaded UI strings for {} languages (source: {})",
            file.languages.len(),
            source
        );

        Ok(Self {
            source,
            languages: file.languages,
        })
    }

    /// Look up `key` for `lang`.
    ///
    /// Resolution order: the exact language, then the source language, then
    /// `default`. Without a default a missing entry is an error.
    pub fn get<'a>(
        &'a self,
        lang: &LanguageCode,
        key: UiKey,
        default: Option<&'a str>,
    ) -> Result<&'a str, UiError> {
        [lang, &self.source]
            .into_iter()
            .find_map(|l| self.languages.get(l).and_then(|e| e.strings.get(&key)))
            .map(String::as_str)
            .or(default)
            .ok_or_else(|| UiError::MissingString {
                lang: lang.to_string(),
                key,
            })
    }

    /// Whether `lang` is written right to left.
    pub fn is_rtl(&self, lang: &LanguageCode) -> bool {
        self.languages.get(lang).is_some_and(|e| e.rtl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LanguageCode {
        code.parse().unwrap()
    }

    const TABLE: &str = r#"{
        "languages": {
            "en": {"strings": {"faq": "FAQ", "more_guides": "More guides"}},
            "es": {"strings": {"faq": "Preguntas frecuentes"}},
            "ar": {"rtl": true, "strings": {}}
        }
    }"#;

    #[test]
    fn resolves_exact_then_source_then_default() {
        let ui = UiStrings::from_json(lang("en"), TABLE).unwrap();

        assert_eq!(ui.get(&lang("es"), UiKey::Faq, None).unwrap(), "Preguntas frecuentes");
        assert_eq!(ui.get(&lang("es"), UiKey::MoreGuides, None).unwrap(), "More guides");
        assert_eq!(
            ui.get(&lang("es"), UiKey::BackToUpdates, Some("All updates")).unwrap(),
            "All updates"
        );
    }

    #[test]
    fn missing_without_default_names_lang_and_key() {
        let ui = UiStrings::from_json(lang("en"), TABLE).unwrap();

        let err = ui.get(&lang("de"), UiKey::MoreUpdates, None).unwrap_err();

        assert_eq!(
            err,
            UiError::MissingString {
                lang: "de".into(),
                key: UiKey::MoreUpdates
            }
        );
        let message = err.to_string();
        assert!(message.contains("de"));
        assert!(message.contains("more_updates"));
    }

    #[test]
    fn marks_rtl_languages() {
        let ui = UiStrings::from_json(lang("en"), TABLE).unwrap();

        assert!(ui.is_rtl(&lang("ar")));
        assert!(!ui.is_rtl(&lang("es")));
        assert!(!ui.is_rtl(&lang("zz")));
    }

    #[test]
    fn rejects_keys_outside_the_closed_set() {
        let table = r#"{"languages": {"en": {"strings": {"made_up": "x"}}}}"#;
        assert!(matches!(
            UiStrings::from_json(lang("en"), table),
            Err(UiError::Parse(_))
        ));
    }

    #[test]
    fn builtin_table_covers_every_key_for_the_source_language() {
        let ui = UiStrings::builtin(lang("en")).unwrap();
        let en = lang("en");

        for key in ALL_KEYS {
            assert!(ui.get(&en, *key, None).is_ok(), "missing {key}");
        }
        assert!(ui.is_rtl(&lang("ar")));
        assert_eq!(ui.get(&lang("es"), UiKey::Faq, None).unwrap(), "Preguntas frecuentes");
        assert_eq!(ui.get(&lang("de"), UiKey::ContactSubmit, None).unwrap(), "Nachricht senden");
    }

    const ALL_KEYS: &[UiKey] = &[
        UiKey::SocialTrading,
        UiKey::CopyTrading,
        UiKey::Updates,
        UiKey::Videos,
        UiKey::About,
        UiKey::Faq,
        UiKey::TryEtoro,
        UiKey::RiskWarningLabel,
        UiKey::RiskWarningBanner,
        UiKey::RiskWarningFull,
        UiKey::RiskWarningFooter,
        UiKey::RiskWarningSidebar,
        UiKey::ImportantReminder,
        UiKey::ImportantReminderText,
        UiKey::ReadyToTry,
        UiKey::TomsAffiliate,
        UiKey::ExploreEtoro,
        UiKey::ReadyCtaInline,
        UiKey::InThisArticle,
        UiKey::MoreGuides,
        UiKey::MoreUpdates,
        UiKey::BackToUpdates,
        UiKey::FaqHeading,
        UiKey::ByTom,
        UiKey::BreadcrumbHome,
        UiKey::GuideSocial,
        UiKey::GuideCopy,
        UiKey::GuideReturns,
        UiKey::GuideScam,
        UiKey::GuideProfits,
        UiKey::GuideAllVideos,
        UiKey::FooterBrand,
        UiKey::FooterGuides,
        UiKey::FooterSite,
        UiKey::FooterUpdates,
        UiKey::FooterAbout,
        UiKey::FooterFaq,
        UiKey::FooterContact,
        UiKey::ContactName,
        UiKey::ContactEmail,
        UiKey::ContactMessage,
        UiKey::ContactSubmit,
        UiKey::ContactSubject,
    ];
}
