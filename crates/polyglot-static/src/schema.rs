//! JSON-LD structured data.

use serde_json::{json, Value};

use polyglot_content::FaqEntry;

/// Site-wide publisher facts used by the schemas.
#[derive(Debug, Clone, Copy)]
pub struct Publisher<'a> {
    pub name: &'a str,
    pub base_url: &'a str,
    pub author: &'a str,
    pub author_url: &'a str,
}

/// `Article` schema. `url` is omitted for the minimal form.
pub fn article(publisher: Publisher<'_>, headline: &str, description: &str, url: Option<&str>) -> Value {
    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": headline,
        "description": description,
        "author": {
            "@type": "Person",
            "name": publisher.author,
            "url": publisher.author_url,
        },
        "publisher": {
            "@type": "Organization",
            "name": publisher.name,
            "url": publisher.base_url,
        },
    });

    if let (Some(url), Some(map)) = (url, schema.as_object_mut()) {
        map.insert("url".to_string(), Value::from(url));
    }

    schema
}

/// `FAQPage` schema with one question per entry.
pub fn faq_page(faqs: &[FaqEntry]) -> Value {
    let entities: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": faq.answer,
                },
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    })
}

/// Two-level `BreadcrumbList`: home, then the page itself.
pub fn breadcrumbs(home_label: &str, home_url: &str, name: &str, url: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            {"@type": "ListItem", "position": 1, "name": home_label, "item": home_url},
            {"@type": "ListItem", "position": 2, "name": name, "item": url},
        ],
    })
}

/// Serialize a schema for embedding in a `<script>` element.
///
/// `</` is written as `<\/` so copy can never close the script early.
pub fn to_script(schema: &Value) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string_pretty(schema)?.replace("</", "<\\/"))
}
