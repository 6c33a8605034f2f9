//! Text escaping for XML output

/// Escapes raw text for embedding in the XML fragment
pub trait TextEscaper: Send + Sync {
    /// Escape text so it can be placed between tags
    fn escape(&self, raw: &str) -> String;

    /// Render `raw` as a `<text>` element indented by `indent` levels of
    /// two spaces, followed by a newline
    fn write_text(&self, raw: &str, indent: usize) -> String {
        format!("{}<text>{}</text>\n", "  ".repeat(indent), self.escape(raw))
    }
}

/// Default escaper: text containing markup characters is wrapped in CDATA
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlEscaper;

impl XmlEscaper {
    pub fn new() -> Self {
        Self
    }
}

impl TextEscaper for XmlEscaper {
    fn escape(&self, raw: &str) -> String {
        if raw.contains(['&', '<', '>', '"', '\'']) {
            // "]]>" would end the section early
            format!("<![CDATA[{}]]>", raw.replace("]]>", "]]]]><![CDATA[>"))
        } else {
            raw.to_string()
        }
    }
}

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(XmlEscaper.escape("The cat sat"), "The cat sat");
        assert_eq!(XmlEscaper.escape(""), "");
        assert_eq!(XmlEscaper.escape("{:SA:=cat}"), "{:SA:=cat}");
    }

    #[test]
    fn test_markup_wrapped_in_cdata() {
        assert_eq!(XmlEscaper.escape("<p>Hi</p>"), "<![CDATA[<p>Hi</p>]]>");
        assert_eq!(XmlEscaper.escape("Tom & Jerry"), "<![CDATA[Tom & Jerry]]>");
        assert_eq!(XmlEscaper.escape("it's"), "<![CDATA[it's]]>");
    }

    #[test]
    fn test_cdata_terminator_split() {
        assert_eq!(
            XmlEscaper.escape("a]]>b<"),
            "<![CDATA[a]]]]><![CDATA[>b<]]>"
        );
    }

    #[test]
    fn test_write_text_indent() {
        assert_eq!(XmlEscaper.write_text("cat", 3), "      <text>cat</text>\n");
        assert_eq!(XmlEscaper.write_text("a&b", 1), "  <text><![CDATA[a&b]]></text>\n");
        assert_eq!(XmlEscaper.write_text("x", 0), "<text>x</text>\n");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("plain.png"), "plain.png");
        assert_eq!(escape_attribute("a\"b&c<d"), "a&quot;b&amp;c&lt;d");
    }
}
