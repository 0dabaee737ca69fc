//! Rendering references for image thumbnails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default thumbnail edge in pixels.
pub const THUMBNAIL_SIZE: u32 = 48;

/// Edge used by previews.
pub const PREVIEW_SIZE: u32 = 32;

/// A sized, cropped image reference; displays as an `<img>` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL with the crop transform applied.
    pub src: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Alternative text.
    pub alt: String,
    /// CSS class.
    pub class: String,
}

impl fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<img src="{}" width="{}" height="{}" alt="{}" class="{}">"#,
            escape_attr(&self.src),
            self.width,
            self.height,
            escape_attr(&self.alt),
            escape_attr(&self.class)
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_escapes_attributes() {
        let thumb = Thumbnail {
            src: "http://localhost/files/image/local/a.png?w=48&h=48&fit=crop".into(),
            width: 48,
            height: 48,
            alt: "\"quoted\" <alt>".into(),
            class: "img-rounded".into(),
        };
        assert_eq!(
            thumb.to_string(),
            "<img src=\"http://localhost/files/image/local/a.png?w=48&amp;h=48&amp;fit=crop\" \
             width=\"48\" height=\"48\" alt=\"&quot;quoted&quot; &lt;alt&gt;\" class=\"img-rounded\">"
        );
    }
}
