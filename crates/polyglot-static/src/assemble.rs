//! Page assembly: one variant plus its chrome to a complete HTML document.

use polyglot_content::{
    LanguageCode, PageKind, PageVariant, SourceExtract, UiError, UiKey, UiStrings,
};

use crate::error::VariantError;
use crate::render::{risk_warning, BlockRenderer};
use crate::route::Route;
use crate::schema::{self, Publisher};
use crate::site::{LogicalPage, SiteConfig};
use crate::templates::{
    template_for, BackLink, Chrome, Content, Footer, Form, Hero, InlineCta, Link, OpenGraph,
    PageContext, PageMeta, Sidebar, TemplateEngine,
};

const NAV_LINKS: [(&str, UiKey); 6] = [
    ("social-trading.html", UiKey::SocialTrading),
    ("copy-trading.html", UiKey::CopyTrading),
    ("updates.html", UiKey::Updates),
    ("videos.html", UiKey::Videos),
    ("about.html", UiKey::About),
    ("faq.html", UiKey::Faq),
];

const FOOTER_GUIDES: [(&str, UiKey); 4] = [
    ("social-trading.html", UiKey::GuideSocial),
    ("copy-trading.html", UiKey::GuideCopy),
    ("etoro-scam.html", UiKey::GuideScam),
    ("copy-trading-returns.html", UiKey::GuideReturns),
];

const FOOTER_SITE: [(&str, UiKey); 4] = [
    ("updates.html", UiKey::FooterUpdates),
    ("about.html", UiKey::FooterAbout),
    ("faq.html", UiKey::FooterFaq),
    ("contact.html", UiKey::FooterContact),
];

const SIDEBAR_GUIDES: [(&str, UiKey); 5] = [
    ("social-trading.html", UiKey::GuideSocial),
    ("copy-trading.html", UiKey::GuideCopy),
    ("etoro-scam.html", UiKey::GuideScam),
    ("copy-trading-returns.html", UiKey::GuideReturns),
    ("taking-profits.html", UiKey::GuideProfits),
];

const CONTACT_STYLE: &str = "    .contact-form { max-width: 560px; }
    .form-group { margin-bottom: 20px; }
    .form-group label { display: block; font-weight: 600; margin-bottom: 6px; }
    .form-group input, .form-group textarea { width: 100%; padding: 12px 14px; border: 1px solid var(--border); border-radius: 8px; font: inherit; }
    .form-group textarea { min-height: 160px; resize: vertical; }";

/// One variant to assemble.
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    pub page: &'a LogicalPage<'a>,
    pub route: &'a Route,
    pub variant: &'a PageVariant,
    /// Source-language extras, for updates
    pub extract: Option<&'a SourceExtract>,
}

/// What the context of one variant is built from.
#[derive(Clone, Copy)]
struct Frame<'a> {
    route: &'a Route,
    variant: &'a PageVariant,
    extract: Option<&'a SourceExtract>,
    cta_url: &'a str,
    hreflang: &'a str,
}

/// Assembles complete pages from variants, UI strings and templates.
pub struct Assembler<'a> {
    site: &'a SiteConfig,
    ui: &'a UiStrings,
    templates: &'a TemplateEngine,
}

/// UI lookups for one language.
struct Strings<'a> {
    ui: &'a UiStrings,
    lang: &'a LanguageCode,
}

impl<'a> Strings<'a> {
    fn get(&self, key: UiKey) -> Result<String, UiError> {
        self.ui.get(self.lang, key, None).map(str::to_string)
    }

    fn get_or(&self, key: UiKey, default: &'a str) -> Result<String, UiError> {
        self.ui.get(self.lang, key, Some(default)).map(str::to_string)
    }

    fn links(&self, prefix: &str, table: &[(&str, UiKey)]) -> Result<Vec<Link>, UiError> {
        table
            .iter()
            .map(|(href, key)| {
                Ok(Link {
                    href: format!("{prefix}{href}"),
                    label: self.get(*key)?,
                })
            })
            .collect()
    }
}

impl<'a> Assembler<'a> {
    pub fn new(site: &'a SiteConfig, ui: &'a UiStrings, templates: &'a TemplateEngine) -> Self {
        Self { site, ui, templates }
    }

    /// Render one variant to a full HTML document.
    pub fn assemble(&self, input: PageInput<'_>) -> Result<String, VariantError> {
        let PageInput {
            page,
            route,
            variant,
            extract,
        } = input;
        let frame = Frame {
            route,
            variant,
            extract,
            cta_url: &page.cta_url,
            hreflang: page.hreflang.as_str(),
        };
        let context = self.context(frame)?;

        self.templates
            .render_page(template_for(route.kind), &context)
            .map_err(|e| VariantError::Template(e.to_string()))
    }

    /// Resolve every UI string `variant` needs on `route`, without rendering.
    ///
    /// Run while planning, so a variant that cannot be assembled never shows
    /// up in another page's hreflang block.
    pub fn check(&self, route: &Route, variant: &PageVariant, cta_url: &str) -> Result<(), VariantError> {
        self.context(Frame {
            route,
            variant,
            extract: None,
            cta_url,
            hreflang: "",
        })
        .map(drop)
    }

    fn context(&self, frame: Frame<'_>) -> Result<PageContext, VariantError> {
        let Frame {
            route,
            variant,
            extract,
            cta_url,
            hreflang,
        } = frame;
        let kind = route.kind;
        let lang = &variant.language;
        let strings = Strings { ui: self.ui, lang };
        let rtl = self.ui.is_rtl(lang);
        let prefix = route.asset_prefix();
        let canonical = route.url(&self.site.base_url);

        let risk_label = strings.get(UiKey::RiskWarningLabel)?;
        let risk_full = strings.get(UiKey::RiskWarningFull)?;
        let renderer = BlockRenderer::new(&prefix, &risk_label, &risk_full);
        let body = renderer.render_body(&variant.body);

        let title = variant
            .title
            .clone()
            .unwrap_or_else(|| format!("{} | {}", variant.h1, self.site.name));
        let og = OpenGraph {
            title: variant.og_title.clone().unwrap_or_else(|| title.clone()),
            description: variant
                .og_description
                .clone()
                .unwrap_or_else(|| variant.meta_description.clone()),
            kind: variant
                .og_type
                .clone()
                .unwrap_or_else(|| kind.default_og_type().to_string()),
        };

        let schemas = self
            .schemas(kind, variant, &canonical, &og.kind, &strings)?
            .iter()
            .map(schema::to_script)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VariantError::Schema(e.to_string()))?;

        let hero = Hero {
            tag: match kind {
                PageKind::Faq => Some(or_ui(&variant.tag, &strings, UiKey::Faq)?),
                PageKind::Contact => Some(or_ui(&variant.tag, &strings, UiKey::FooterContact)?),
                _ => variant.tag.clone(),
            },
            h1: variant.h1.clone(),
            byline: match kind {
                PageKind::Faq => variant.byline.clone(),
                PageKind::Contact => None,
                _ => Some(match &variant.byline {
                    Some(byline) => byline.clone(),
                    None => format!(
                        "{}\u{a0}·\u{a0}{}",
                        strings.get(UiKey::ByTom)?,
                        self.site.publisher
                    ),
                }),
            },
        };

        let opening = || risk_warning(&risk_label, &risk_full).render();
        let mut sidebar = None;
        let mut inline_style = None;
        let content = match kind {
            PageKind::Article => {
                let links = self.guide_links(&prefix, &strings)?;
                let heading = strings.get(UiKey::MoreGuides)?;
                sidebar = Some(self.sidebar(cta_url, variant, &strings, heading, links)?);
                Content {
                    intro: variant.intro.clone(),
                    toc_heading: Some(strings.get(UiKey::InThisArticle)?),
                    toc: body.toc,
                    opening_html: Some(opening()),
                    cta: Some(InlineCta {
                        text: strings.get(UiKey::ReadyCtaInline)?,
                        button: strings.get(UiKey::ExploreEtoro)?,
                        href: cta_url.to_string(),
                    }),
                    body_html: body.html,
                    faq_heading: Some(strings.get(UiKey::FaqHeading)?),
                    faqs: variant.faqs.clone(),
                    closing_html: Some(
                        risk_warning(
                            &strings.get(UiKey::ImportantReminder)?,
                            &strings.get(UiKey::ImportantReminderText)?,
                        )
                        .render(),
                    ),
                    ..Content::default()
                }
            }
            PageKind::Backbone => {
                let links = self.guide_links(&prefix, &strings)?;
                let heading = strings.get(UiKey::MoreGuides)?;
                sidebar = Some(self.sidebar(cta_url, variant, &strings, heading, links)?);
                Content {
                    body_html: body.html,
                    ..Content::default()
                }
            }
            PageKind::Update => {
                let back = strings.get_or(UiKey::BackToUpdates, "All updates")?;
                let (back_arrow, forward_arrow) = if rtl { ("→", "←") } else { ("←", "→") };
                let updates_href = format!("{prefix}updates.html");

                // Sibling links were extracted relative to the updates directory.
                let siblings_prefix = format!("{prefix}updates/");
                let siblings = BlockRenderer::new(&siblings_prefix, "", "");
                let mut links: Vec<Link> = extract
                    .map(|e| e.sidebar_links.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(|link| Link {
                        href: siblings.resolve(&link.href),
                        label: link.text.clone(),
                    })
                    .collect();
                links.push(Link {
                    href: updates_href.clone(),
                    label: format!("{back} {forward_arrow}"),
                });
                let heading = strings.get_or(UiKey::MoreUpdates, "More updates")?;
                sidebar = Some(self.sidebar(cta_url, variant, &strings, heading, links)?);

                let video_src = variant
                    .video_embed_src
                    .as_deref()
                    .or_else(|| extract.and_then(|e| e.video_embed_src.as_deref()));
                let video_title = variant
                    .video_embed_title
                    .as_deref()
                    .or_else(|| extract.and_then(|e| e.video_embed_title.as_deref()))
                    .unwrap_or(&variant.h1);

                Content {
                    opening_html: Some(opening()),
                    video_html: video_src.map(|src| renderer.video(src, video_title).render()),
                    body_html: body.html,
                    back: Some(BackLink {
                        href: updates_href,
                        label: back,
                        arrow: back_arrow.to_string(),
                    }),
                    ..Content::default()
                }
            }
            PageKind::Faq => {
                let links = self.guide_links(&prefix, &strings)?;
                let heading = strings.get(UiKey::FooterGuides)?;
                sidebar = Some(self.sidebar(cta_url, variant, &strings, heading, links)?);
                Content {
                    opening_html: Some(opening()),
                    faqs: variant.faqs.clone(),
                    closing_html: Some(
                        risk_warning(&strings.get(UiKey::ImportantReminder)?, &risk_full).render(),
                    ),
                    ..Content::default()
                }
            }
            PageKind::Contact => {
                inline_style = Some(CONTACT_STYLE.to_string());
                let reminder_title = or_ui(&variant.reminder_title, &strings, UiKey::ImportantReminder)?;
                let reminder_text =
                    or_ui(&variant.reminder_text, &strings, UiKey::ImportantReminderText)?;
                Content {
                    intro: variant.intro.clone(),
                    form: Some(self.form(variant, &strings)?),
                    closing_html: Some(risk_warning(&reminder_title, &reminder_text).render()),
                    ..Content::default()
                }
            }
        };

        Ok(PageContext {
            page: PageMeta {
                lang: lang.to_string(),
                rtl,
                title,
                meta_description: variant.meta_description.clone(),
                og,
                canonical,
                hreflang: hreflang.to_string(),
                prefix: prefix.clone(),
                schemas,
                analytics_id: self.site.analytics_id.clone(),
                inline_style,
                hero,
                scripts: scripts(kind).iter().map(|s| s.to_string()).collect(),
            },
            chrome: self.chrome(&prefix, &strings)?,
            content,
            sidebar,
        })
    }

    fn schemas(
        &self,
        kind: PageKind,
        variant: &PageVariant,
        canonical: &str,
        og_type: &str,
        strings: &Strings<'_>,
    ) -> Result<Vec<serde_json::Value>, UiError> {
        let author_url = self.site.author_url();
        let publisher = Publisher {
            name: &self.site.publisher,
            base_url: self.site.root_url(),
            author: &self.site.author,
            author_url: &author_url,
        };
        let headline = variant.h1.as_str();
        let description = variant.meta_description.as_str();

        let schemas = match kind {
            PageKind::Article => {
                vec![
                    schema::article(publisher, headline, description, Some(canonical)),
                    schema::faq_page(&variant.faqs),
                    schema::breadcrumbs(
                        &strings.get(UiKey::BreadcrumbHome)?,
                        self.site.root_url(),
                        headline,
                        canonical,
                    ),
                ]
            }
            PageKind::Faq => vec![schema::faq_page(&variant.faqs)],
            _ if og_type == "article" => vec![schema::article(publisher, headline, description, None)],
            _ => Vec::new(),
        };

        Ok(schemas)
    }

    fn chrome(&self, prefix: &str, strings: &Strings<'_>) -> Result<Chrome, UiError> {
        let banner = strings.get(UiKey::RiskWarningBanner)?;
        let banner = match banner.split_once(": ") {
            Some((_, rest)) => rest.to_string(),
            None => banner,
        };

        Ok(Chrome {
            home: format!("{prefix}index.html"),
            nav: strings.links(prefix, &NAV_LINKS)?,
            try_label: strings.get(UiKey::TryEtoro)?,
            risk_label: strings.get(UiKey::RiskWarningLabel)?,
            banner,
            footer: Footer {
                brand: strings.get(UiKey::FooterBrand)?,
                guides_heading: strings.get(UiKey::FooterGuides)?,
                guides: strings.links(prefix, &FOOTER_GUIDES)?,
                site_heading: strings.get(UiKey::FooterSite)?,
                site: strings.links(prefix, &FOOTER_SITE)?,
                copyright: self.site.copyright.clone(),
                disclaimer: strings.get(UiKey::RiskWarningFooter)?,
            },
        })
    }

    /// Call to action plus the "more guides" list, with the variant's overrides.
    fn sidebar(
        &self,
        cta_url: &str,
        variant: &PageVariant,
        strings: &Strings<'_>,
        nav_heading: String,
        links: Vec<Link>,
    ) -> Result<Sidebar, UiError> {
        let overrides = &variant.sidebar;
        let risk = strings.get(UiKey::RiskWarningSidebar)?;
        let (risk_head, risk_tail) = match risk.split_once('.') {
            Some((head, tail)) => (format!("{head}."), tail.trim_start().to_string()),
            None => (risk.clone(), String::new()),
        };

        Ok(Sidebar {
            cta_heading: or_ui(&overrides.cta_heading, strings, UiKey::ReadyToTry)?,
            cta_text: or_ui(&overrides.cta_text, strings, UiKey::TomsAffiliate)?,
            cta_button: or_ui(&overrides.cta_button, strings, UiKey::ExploreEtoro)?,
            cta_url: cta_url.to_string(),
            risk_head,
            risk_tail,
            nav_heading: overrides.nav_heading.clone().unwrap_or(nav_heading),
            links,
        })
    }

    fn guide_links(&self, prefix: &str, strings: &Strings<'_>) -> Result<Vec<Link>, UiError> {
        let mut links: Vec<Link> = self
            .site
            .articles
            .iter()
            .map(|article| Link {
                href: format!("{prefix}{}/", article.slug),
                label: article.label.clone().unwrap_or_else(|| article.id.clone()),
            })
            .collect();
        links.extend(strings.links(prefix, &SIDEBAR_GUIDES)?);
        links.push(Link {
            href: format!("{prefix}videos.html"),
            label: strings.get(UiKey::GuideAllVideos)?,
        });
        Ok(links)
    }

    /// Contact form labels: the variant's own, then the UI table.
    fn form(&self, variant: &PageVariant, strings: &Strings<'_>) -> Result<Form, UiError> {
        let labels = &variant.form_labels;
        let placeholder = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(Form {
            action: self.site.contact_form_action.clone(),
            subject: format!(
                "{} {} ({})",
                strings.get(UiKey::ContactSubject)?,
                self.site.name,
                variant.language
            ),
            next: format!("{}/contact-thanks.html", self.site.root_url()),
            name: or_ui(&labels.name, strings, UiKey::ContactName)?,
            name_placeholder: placeholder(&labels.name_placeholder),
            email: or_ui(&labels.email, strings, UiKey::ContactEmail)?,
            email_placeholder: placeholder(&labels.email_placeholder),
            message: or_ui(&labels.message, strings, UiKey::ContactMessage)?,
            message_placeholder: placeholder(&labels.message_placeholder),
            submit: or_ui(&labels.submit, strings, UiKey::ContactSubmit)?,
        })
    }
}

/// A variant-supplied string, falling back to the UI table.
fn or_ui(value: &Option<String>, strings: &Strings<'_>, key: UiKey) -> Result<String, UiError> {
    match value {
        Some(value) => Ok(value.clone()),
        None => strings.get(key),
    }
}

fn scripts(kind: PageKind) -> &'static [&'static str] {
    match kind {
        PageKind::Article => &["nav.js"],
        PageKind::Backbone => &["lightbox.js", "nav.js"],
        PageKind::Update | PageKind::Faq | PageKind::Contact => {
            &["lightbox.js", "nav.js", "lang-switcher.js"]
        }
    }
}
