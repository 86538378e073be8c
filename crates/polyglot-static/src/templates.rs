//! Template engine for rendering site pages.

use std::fmt::Write as _;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;

use polyglot_content::{FaqEntry, PageKind};

use crate::html;
use crate::render::TocEntry;

/// A labelled link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub label: String,
}

/// Open Graph metadata.
#[derive(Debug, Clone, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub kind: String,
}

/// Heading area above the content.
#[derive(Debug, Clone, Serialize)]
pub struct Hero {
    pub tag: Option<String>,
    pub h1: String,
    pub byline: Option<String>,
}

/// Everything in `<head>` plus page-level settings.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub lang: String,
    pub rtl: bool,
    pub title: String,
    pub meta_description: String,
    pub og: OpenGraph,
    pub canonical: String,
    /// Pre-rendered alternate links
    pub hreflang: String,
    pub prefix: String,
    /// Serialized JSON-LD documents
    pub schemas: Vec<String>,
    pub analytics_id: String,
    /// Page-local CSS
    pub inline_style: Option<String>,
    pub hero: Hero,
    /// Script file names under `js/`
    pub scripts: Vec<String>,
}

/// Footer columns.
#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub brand: String,
    pub guides_heading: String,
    pub guides: Vec<Link>,
    pub site_heading: String,
    pub site: Vec<Link>,
    pub copyright: String,
    pub disclaimer: String,
}

/// Navigation, banner and footer shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub home: String,
    pub nav: Vec<Link>,
    pub try_label: String,
    pub risk_label: String,
    pub banner: String,
    pub footer: Footer,
}

/// Sidebar with the call to action and a link list.
#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    pub cta_heading: String,
    pub cta_text: String,
    pub cta_button: String,
    pub cta_url: String,
    /// First sentence of the sidebar risk warning
    pub risk_head: String,
    pub risk_tail: String,
    pub nav_heading: String,
    pub links: Vec<Link>,
}

/// The inline call to action inside an article.
#[derive(Debug, Clone, Serialize)]
pub struct InlineCta {
    pub text: String,
    pub button: String,
    pub href: String,
}

/// The "back to updates" link.
#[derive(Debug, Clone, Serialize)]
pub struct BackLink {
    pub href: String,
    pub label: String,
    pub arrow: String,
}

/// Contact form labels and hidden fields.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub action: String,
    pub subject: String,
    pub next: String,
    pub name: String,
    pub name_placeholder: String,
    pub email: String,
    pub email_placeholder: String,
    pub message: String,
    pub message_placeholder: String,
    pub submit: String,
}

/// Main content region. Which fields are set depends on the page kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Content {
    pub intro: Option<String>,
    pub toc_heading: Option<String>,
    pub toc: Vec<TocEntry>,
    /// Pre-rendered warning boxes
    pub opening_html: Option<String>,
    pub closing_html: Option<String>,
    pub cta: Option<InlineCta>,
    pub video_html: Option<String>,
    pub body_html: String,
    pub faq_heading: Option<String>,
    pub faqs: Vec<FaqEntry>,
    pub back: Option<BackLink>,
    pub form: Option<Form>,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub page: PageMeta,
    pub chrome: Chrome,
    pub content: Content,
    pub sidebar: Option<Sidebar>,
}

/// Template used for each page kind.
pub fn template_for(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Article => "article.html",
        PageKind::Backbone => "backbone.html",
        PageKind::Update => "update.html",
        PageKind::Faq => "faq.html",
        PageKind::Contact => "contact.html",
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the site templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        // minijinja's own HTML escaper also rewrites `/`, which mangles URLs.
        env.set_formatter(|out, state, value| {
            if matches!(state.auto_escape(), AutoEscape::Html) && !value.is_safe() {
                if let Some(s) = value.as_str() {
                    out.write_str(&html::escape(s))?;
                    return Ok(());
                }
            }
            minijinja::escape_formatter(out, state, value)
        });

        for (name, source) in TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())?;
        }

        Ok(Self { env })
    }

    /// Render a page using the specified template.
    pub fn render_page(&self, template: &str, context: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }
}

const TEMPLATES: [(&str, &str); 9] = [
    ("base.html", BASE_TEMPLATE),
    ("nav.html", NAV_TEMPLATE),
    ("footer.html", FOOTER_TEMPLATE),
    ("sidebar.html", SIDEBAR_TEMPLATE),
    ("article.html", ARTICLE_TEMPLATE),
    ("backbone.html", BACKBONE_TEMPLATE),
    ("update.html", UPDATE_TEMPLATE),
    ("faq.html", FAQ_TEMPLATE),
    ("contact.html", CONTACT_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ page.lang }}"{% if page.rtl %} dir="rtl"{% endif %}>
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="description" content="{{ page.meta_description }}" />
  <meta property="og:title" content="{{ page.og.title }}" />
  <meta property="og:description" content="{{ page.og.description }}" />
  <meta property="og:type" content="{{ page.og.kind }}" />
  <link rel="canonical" href="{{ page.canonical }}" />
{{ page.hreflang | safe }}
  <title>{{ page.title }}</title>
  <link rel="stylesheet" href="{{ page.prefix }}css/style.css" />
{% if page.inline_style %}
  <style>
{{ page.inline_style | safe }}
  </style>
{% endif %}
{% for schema in page.schemas %}
  <script type="application/ld+json">
{{ schema | safe }}
  </script>
{% endfor %}
  <!-- Google tag (gtag.js) -->
  <script async src="https://www.googletagmanager.com/gtag/js?id={{ page.analytics_id }}"></script>
  <script>
    window.dataLayer = window.dataLayer || [];
    function gtag(){dataLayer.push(arguments);}
    gtag('js', new Date());
    gtag('config', '{{ page.analytics_id }}');
  </script>
</head>
<body>

{% include "nav.html" %}

  <div class="risk-warning-banner">
    <span>{{ chrome.risk_label }}:</span> {{ chrome.banner }}
  </div>

  <div class="article-hero">
    <div class="container">
{% if page.hero.tag %}
      <div class="article-tag">{{ page.hero.tag }}</div>
{% endif %}
      <h1>{{ page.hero.h1 }}</h1>
{% if page.hero.byline %}
      <p class="article-meta">{{ page.hero.byline }}</p>
{% endif %}
    </div>
  </div>

{% block content %}{% endblock %}

{% include "footer.html" %}

{% for script in page.scripts %}
  <script src="{{ page.prefix }}js/{{ script }}"></script>
{% endfor %}
  <script>
  document.addEventListener('click', function(e) {
    var link = e.target.closest('a.btn-primary');
    if (!link) return;
    if (typeof gtag === 'function') {
      gtag('event', 'cta_click', {
        'event_category': 'affiliate',
        'event_label': link.textContent.trim(),
        'link_url': link.href || '',
        'page_path': location.pathname
      });
    }
  });
  </script>
</body>
</html>
"##;

const NAV_TEMPLATE: &str = r##"  <nav>
    <div class="container nav-inner">
      <a href="{{ chrome.home }}" class="nav-logo">Social<span>Trading</span>Vlog</a>
      <ul class="nav-links">
{% for link in chrome.nav %}
        <li><a href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
        <li><a href="#etoro-cta" class="nav-cta">{{ chrome.try_label }}</a></li>
      </ul>
      <button class="nav-hamburger" id="nav-hamburger" aria-label="Open navigation" aria-expanded="false" aria-controls="nav-drawer">
        <span></span><span></span><span></span>
      </button>
    </div>
  </nav>
  <div class="nav-drawer" id="nav-drawer" role="navigation" aria-label="Mobile navigation">
    <ul>
{% for link in chrome.nav %}
      <li><a href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
      <li><a href="#etoro-cta" class="nav-cta">{{ chrome.try_label }}</a></li>
    </ul>
  </div>
"##;

const FOOTER_TEMPLATE: &str = r##"  <footer>
    <div class="container">
      <div class="footer-inner">
        <div class="footer-brand">
          <div class="nav-logo">Social<span style="color:var(--accent)">Trading</span>Vlog</div>
          <p>{{ chrome.footer.brand }}</p>
        </div>
        <div class="footer-col">
          <h4>{{ chrome.footer.guides_heading }}</h4>
          <ul>
{% for link in chrome.footer.guides %}
            <li><a href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
          </ul>
        </div>
        <div class="footer-col">
          <h4>{{ chrome.footer.site_heading }}</h4>
          <ul>
{% for link in chrome.footer.site %}
            <li><a href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
          </ul>
        </div>
      </div>
      <div class="footer-bottom">
        <p>&copy; {{ chrome.footer.copyright }}</p>
        <p class="footer-disclaimer">{{ chrome.footer.disclaimer }}</p>
      </div>
    </div>
  </footer>
"##;

const SIDEBAR_TEMPLATE: &str = r##"{% if sidebar %}
      <aside class="article-sidebar">
        <div class="sidebar-cta" id="etoro-cta">
          <h3>{{ sidebar.cta_heading }}</h3>
          <p>{{ sidebar.cta_text }}</p>
          <a href="{{ sidebar.cta_url }}" class="btn btn-primary" target="_blank" rel="noopener sponsored">{{ sidebar.cta_button }}</a>
          <div class="risk-warning">
            <strong>{{ sidebar.risk_head }}</strong>
            {{ sidebar.risk_tail }}
          </div>
        </div>
        <div class="sidebar-nav">
          <h4>{{ sidebar.nav_heading }}</h4>
          <ul>
{% for link in sidebar.links %}
            <li><a href="{{ link.href }}">{{ link.label }}</a></li>
{% endfor %}
          </ul>
        </div>
      </aside>
{% endif %}
"##;

const ARTICLE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
  <div class="container">
    <div class="article-body">

      <article class="article-content">

{% if content.intro %}
        <p class="article-intro">{{ content.intro }}</p>
{% endif %}

{% if content.toc %}
        <nav class="toc" aria-label="Contents"><h4>{{ content.toc_heading }}</h4><ul>
{% for entry in content.toc %}
          <li><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
{% endfor %}
        </ul></nav>
{% endif %}

{% if content.opening_html %}
{{ content.opening_html | safe }}
{% endif %}

{% if content.cta %}
        <div class="inline-cta">
          <p class="inline-cta-text">{{ content.cta.text }}</p>
          <a href="{{ content.cta.href }}" class="btn btn-primary" target="_blank" rel="noopener sponsored">{{ content.cta.button }}</a>
        </div>
{% endif %}

{{ content.body_html | safe }}

{% if content.faqs %}
        <section class="faq-section">
          <h2>{{ content.faq_heading }}</h2>
{% for faq in content.faqs %}
          <div class="faq-item">
            <h3 class="faq-q">{{ faq.question }}</h3>
            <p class="faq-a">{{ faq.answer }}</p>
          </div>
{% endfor %}
        </section>
{% endif %}

{% if content.closing_html %}
{{ content.closing_html | safe }}
{% endif %}

      </article>

{% include "sidebar.html" %}

    </div>
  </div>
{% endblock %}
"##;

const BACKBONE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
  <div class="container">
    <div class="article-body">

      <article class="article-content">

{{ content.body_html | safe }}

      </article>

{% include "sidebar.html" %}

    </div>
  </div>
{% endblock %}
"##;

const UPDATE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
  <div class="container">
    <div class="article-body">
      <article class="article-content">

{% if content.opening_html %}
{{ content.opening_html | safe }}
{% endif %}
{% if content.video_html %}
{{ content.video_html | safe }}
{% endif %}

{{ content.body_html | safe }}

{% if content.back %}
        <p><a href="{{ content.back.href }}">{{ content.back.arrow }} {{ content.back.label }}</a></p>
{% endif %}

      </article>

{% include "sidebar.html" %}
    </div>
  </div>
{% endblock %}
"##;

const FAQ_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
  <div class="container">
    <div class="article-body">

      <article class="article-content">

{% if content.opening_html %}
{{ content.opening_html | safe }}
{% endif %}
{% for faq in content.faqs %}

        <h2>{{ faq.question }}</h2>
        <p>{{ faq.answer }}</p>
{% endfor %}

{% if content.closing_html %}
{{ content.closing_html | safe }}
{% endif %}

      </article>

{% include "sidebar.html" %}

    </div>
  </div>
{% endblock %}
"##;

const CONTACT_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
  <section>
    <div class="container">
{% if content.intro %}
      <p style="color:var(--muted); margin-bottom: 32px; max-width: 560px;">{{ content.intro }}</p>
{% endif %}

{% if content.form %}
      <form class="contact-form" action="{{ content.form.action }}" method="POST">
        <input type="hidden" name="_subject" value="{{ content.form.subject }}" />
        <input type="hidden" name="_next" value="{{ content.form.next }}" />
        <input type="text" name="_gotcha" style="display:none" />
        <div class="form-group">
          <label for="name">{{ content.form.name }}</label>
          <input type="text" id="name" name="name" placeholder="{{ content.form.name_placeholder }}" required />
        </div>
        <div class="form-group">
          <label for="email">{{ content.form.email }}</label>
          <input type="email" id="email" name="email" placeholder="{{ content.form.email_placeholder }}" required />
        </div>
        <div class="form-group">
          <label for="message">{{ content.form.message }}</label>
          <textarea id="message" name="message" placeholder="{{ content.form.message_placeholder }}" required></textarea>
        </div>
        <button type="submit" class="btn btn-primary" style="width:100%">{{ content.form.submit }}</button>
      </form>
{% endif %}

{% if content.closing_html %}
{{ content.closing_html | safe }}
{% endif %}
    </div>
  </section>
{% endblock %}
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> PageContext {
        PageContext {
            page: PageMeta {
                lang: "es".to_string(),
                rtl: false,
                title: "Hola | Site".to_string(),
                meta_description: "A \"quoted\" description".to_string(),
                og: OpenGraph {
                    title: "Hola".to_string(),
                    description: "d".to_string(),
                    kind: "article".to_string(),
                },
                canonical: "https://example.com/es/hola/".to_string(),
                hreflang: r#"  <link rel="alternate" hreflang="en" href="https://example.com/hello/" />"#
                    .to_string(),
                prefix: "../../".to_string(),
                schemas: vec![],
                analytics_id: "G-TEST".to_string(),
                inline_style: None,
                hero: Hero {
                    tag: None,
                    h1: "Hola <mundo>".to_string(),
                    byline: None,
                },
                scripts: vec!["nav.js".to_string()],
            },
            chrome: Chrome {
                home: "../../index.html".to_string(),
                nav: vec![Link {
                    href: "../../faq.html".to_string(),
                    label: "FAQ".to_string(),
                }],
                try_label: "Probar".to_string(),
                risk_label: "Advertencia".to_string(),
                banner: "Riesgo".to_string(),
                footer: Footer {
                    brand: "Marca".to_string(),
                    guides_heading: "Guías".to_string(),
                    guides: vec![],
                    site_heading: "Sitio".to_string(),
                    site: vec![],
                    copyright: "2026 Example".to_string(),
                    disclaimer: "Aviso".to_string(),
                },
            },
            content: Content {
                body_html: "<p>Cuerpo</p>".to_string(),
                ..Default::default()
            },
            sidebar: None,
        }
    }

    #[test]
    fn renders_backbone_page() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render_page("backbone.html", &context()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"es\">"));
        assert!(html.contains("<h1>Hola &lt;mundo&gt;</h1>"));
        assert!(html.contains("<p>Cuerpo</p>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/es/hola/" />"#));
        assert!(html.contains(r#"hreflang="en" href="https://example.com/hello/""#));
        assert!(html.contains(r#"content="A &quot;quoted&quot; description""#));
        assert!(html.contains(r#"<script src="../../js/nav.js"></script>"#));
        assert!(!html.contains("none"));
        assert!(!html.contains("&#x2f;"));
    }

    #[test]
    fn marks_rtl_pages() {
        let engine = TemplateEngine::new().unwrap();
        let mut ctx = context();
        ctx.page.lang = "ar".to_string();
        ctx.page.rtl = true;

        let html = engine.render_page("backbone.html", &ctx).unwrap();

        assert!(html.contains(r#"<html lang="ar" dir="rtl">"#));
    }

    #[test]
    fn every_kind_has_a_template() {
        let engine = TemplateEngine::new().unwrap();
        for kind in PageKind::ALL {
            let html = engine.render_page(template_for(kind), &context()).unwrap();
            assert_eq!(html.matches("<html").count(), 1);
            assert!(html.trim_end().ends_with("</html>"));
        }
    }

    #[test]
    fn article_toc_links_to_anchors() {
        let engine = TemplateEngine::new().unwrap();
        let mut ctx = context();
        ctx.content.toc_heading = Some("En este artículo".to_string());
        ctx.content.toc = vec![TocEntry {
            title: "Por qué".to_string(),
            id: "por-qué".to_string(),
        }];

        let html = engine.render_page("article.html", &ctx).unwrap();

        assert!(html.contains(r##"<li><a href="#por-qué">Por qué</a></li>"##));
    }
}
