//! HTML escaping and a small element builder.
//!
//! Every attribute value and text child passed to [`Element`] is escaped;
//! only [`Element::raw`] inserts markup verbatim.

use std::borrow::Cow;
use std::fmt;

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        _ => None,
    }
}

/// Escape HTML special characters in text or attribute values.
///
/// Borrows the input when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Raw(String),
    Element(Element),
}

/// An HTML element with escaped attributes and children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, Option<String>)>,
    children: Vec<Node>,
    void: bool,
}

impl Element {
    /// A normal element with a closing tag.
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    /// A void element such as `img` (no children, no closing tag).
    pub fn void(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    /// Add an attribute. The value is always emitted, even when empty.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    /// Add an attribute only when `value` is present.
    pub fn attr_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Add a boolean attribute such as `allowfullscreen`.
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, None));
        self
    }

    /// Append escaped text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append trusted markup verbatim.
    pub fn raw(mut self, html: impl Into<String>) -> Self {
        self.children.push(Node::Raw(html.into()));
        self
    }

    /// Append a child element.
    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    /// Append several child elements.
    pub fn children(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(elements.into_iter().map(Node::Element));
        self
    }

    /// Render to a string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            match value {
                Some(value) => write!(f, " {}=\"{}\"", name, escape(value))?,
                None => write!(f, " {}", name)?,
            }
        }
        f.write_str(">")?;

        if self.void {
            return Ok(());
        }

        // Element children go on their own lines; text stays inline.
        let block = self.children.iter().any(|c| matches!(c, Node::Element(_)));
        for child in &self.children {
            if block {
                f.write_str("\n")?;
            }
            match child {
                Node::Text(text) => f.write_str(&escape(text))?,
                Node::Raw(html) => f.write_str(html)?,
                Node::Element(element) => write!(f, "{}", element)?,
            }
        }
        if block {
            f.write_str("\n")?;
        }

        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("<b>\"Tom's\" & co</b>"), "&lt;b&gt;&quot;Tom&#x27;s&quot; &amp; co&lt;/b&gt;");
        assert!(matches!(escape("plain/text"), Cow::Borrowed(_)));
    }

    #[test]
    fn renders_attributes_and_text() {
        let html = Element::new("a")
            .attr("href", "page.html?a=1&b=2")
            .attr("class", "btn")
            .text("Go <now>")
            .render();

        assert_eq!(html, r#"<a href="page.html?a=1&amp;b=2" class="btn">Go &lt;now&gt;</a>"#);
    }

    #[test]
    fn void_elements_keep_empty_attributes() {
        let html = Element::void("img").attr("src", "a.png").attr("alt", "").render();
        assert_eq!(html, r#"<img src="a.png" alt="">"#);
    }

    #[test]
    fn raw_children_are_not_escaped() {
        let html = Element::new("p").raw("See <a href=\"x.html\">this</a>").render();
        assert_eq!(html, r#"<p>See <a href="x.html">this</a></p>"#);
    }

    #[test]
    fn nested_elements_render_on_separate_lines() {
        let html = Element::new("ul")
            .children(["one", "two"].map(|item| Element::new("li").text(item)))
            .render();

        assert_eq!(html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>");
    }

    #[test]
    fn flags_render_without_value() {
        let html = Element::new("iframe").attr("src", "v").flag("allowfullscreen").render();
        assert_eq!(html, r#"<iframe src="v" allowfullscreen></iframe>"#);
    }
}
