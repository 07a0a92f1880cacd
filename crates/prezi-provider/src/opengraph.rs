//! Open Graph extraction from presentation pages
//!
//! A lenient scanner over raw HTML: it never fails, whatever the markup looks
//! like. Only `<meta property="og:*" content="...">` tags are collected, and
//! the first occurrence of each property wins.

use std::collections::HashMap;

/// Open Graph properties found on a page, keyed without the `og:` prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenGraph {
    properties: HashMap<String, String>,
}

impl OpenGraph {
    /// Parse HTML and collect `og:*` meta properties
    ///
    /// # Examples
    /// ```
    /// use prezi_provider::opengraph::OpenGraph;
    ///
    /// let og = OpenGraph::parse(r#"<meta property="og:title" content="My Deck">"#);
    /// assert_eq!(og.get("title"), Some("My Deck"));
    /// assert_eq!(og.get("image"), None);
    /// ```
    pub fn parse(html: &str) -> Self {
        let mut properties = HashMap::new();

        for attributes in MetaTags::new(html) {
            let property = attributes
                .iter()
                .find(|(name, _)| name == "property")
                .map(|(_, value)| value.trim());
            let content = attributes
                .iter()
                .find(|(name, _)| name == "content")
                .map(|(_, value)| value.as_str());

            if let (Some(property), Some(content)) = (property, content) {
                if let Some(key) = strip_og_prefix(property) {
                    properties
                        .entry(key.to_ascii_lowercase())
                        .or_insert_with(|| decode_html_entities(content).trim().to_string());
                }
            }
        }

        Self { properties }
    }

    /// Get a property by its key without prefix (e.g. `"title"`)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    /// Number of distinct properties found
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if no Open Graph property was found
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn strip_og_prefix(property: &str) -> Option<&str> {
    let prefix = property.get(..3)?;
    if prefix.eq_ignore_ascii_case("og:") {
        Some(&property[3..])
    } else {
        None
    }
}

/// Iterator over the attribute lists of `<meta>` tags in a document
struct MetaTags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> MetaTags<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }
}

impl Iterator for MetaTags<'_> {
    type Item = Vec<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.html.as_bytes();

        while let Some(offset) = self.html[self.pos..].find('<') {
            let start = self.pos + offset;
            let rest = &self.html[start..];

            if rest.starts_with("<!--") {
                self.pos = match rest.find("-->") {
                    Some(end) => start + end + 3,
                    None => self.html.len(),
                };
                continue;
            }

            let is_meta = rest.len() >= 5
                && rest.as_bytes()[1..5].eq_ignore_ascii_case(b"meta")
                && bytes
                    .get(start + 5)
                    .map_or(true, |b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>');

            if !is_meta {
                self.pos = start + 1;
                continue;
            }

            let body_start = start + 5;
            let body_end = find_tag_end(self.html, body_start);
            self.pos = (body_end + 1).min(self.html.len());

            return Some(parse_attributes(&self.html[body_start..body_end]));
        }

        self.pos = self.html.len();
        None
    }
}

/// Position of the `>` closing a tag, honoring quoted attribute values
///
/// An unterminated tag extends to the end of the document.
fn find_tag_end(html: &str, from: usize) -> usize {
    let mut quote: Option<u8> = None;
    for (i, b) in html.as_bytes()[from..].iter().enumerate() {
        match (quote, *b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(*b),
            (None, b'>') => return from + i,
            (None, _) => {}
        }
    }
    html.len()
}

/// Split a tag body into lowercase attribute names and raw values
fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut chars = tag.char_indices().peekable();

    loop {
        while chars
            .peek()
            .is_some_and(|(_, c)| c.is_whitespace() || *c == '/')
        {
            chars.next();
        }

        let Some(&(name_start, _)) = chars.peek() else {
            break;
        };
        let mut name_end = tag.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' || c == '/' {
                name_end = i;
                break;
            }
            chars.next();
        }
        let name = tag[name_start..name_end].to_ascii_lowercase();

        while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        if chars.peek().is_some_and(|(_, c)| *c == '=') {
            chars.next();
            while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
                chars.next();
            }
            match chars.peek().copied() {
                Some((i, q)) if q == '"' || q == '\'' => {
                    chars.next();
                    let value_start = i + 1;
                    let mut value_end = tag.len();
                    for (j, c) in chars.by_ref() {
                        if c == q {
                            value_end = j;
                            break;
                        }
                    }
                    value.push_str(&tag[value_start..value_end]);
                }
                Some((i, _)) => {
                    let mut value_end = tag.len();
                    while let Some(&(j, c)) = chars.peek() {
                        if c.is_whitespace() {
                            value_end = j;
                            break;
                        }
                        chars.next();
                    }
                    value.push_str(&tag[i..value_end]);
                }
                None => {}
            }
        }

        if !name.is_empty() {
            attributes.push((name, value));
        }
    }

    attributes
}

/// Decode named and numeric HTML character references
///
/// Unknown or malformed references are left untouched.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
