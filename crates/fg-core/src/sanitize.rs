//! Input sanitization.
//!
//! Strips the syntactic constructs a downstream renderer could
//! interpret as executable content: script elements, script-capable
//! URI schemes, inline event handlers, and CSS expression calls.
//! Removal passes repeat until the output stops changing, so
//! `sanitize(sanitize(x)) == sanitize(x)` holds even for inputs whose
//! fragments reassemble into a new construct after one pass
//! (`javajavascript:script:` and friends).

use regex::{Regex, RegexBuilder};

/// Ceiling on fixed-point passes. Reached only by pathological input;
/// whatever remains is still caught by the threat scan.
const MAX_PASSES: usize = 8;

/// Removes executable constructs from untrusted text.
pub struct Sanitizer {
    script_elements: Regex,
    script_schemes: Regex,
    data_html: Regex,
    event_handlers: Regex,
    css_expressions: Regex,
    embedded_elements: Regex,
    void_tags: Regex,
    quoted_handlers: Regex,
}

impl Sanitizer {
    pub fn new() -> Self {
        // Compile-time constants; a failure here is a build defect.
        let dotall = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .expect("invalid sanitizer pattern")
        };
        let plain = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("invalid sanitizer pattern")
        };

        Self {
            script_elements: dotall(r"<script\b[^>]*>.*?</script\s*>"),
            script_schemes: plain(r"javascript:|vbscript:"),
            data_html: plain(r"data:text/html"),
            event_handlers: plain(r"\bon\w+\s*="),
            css_expressions: plain(r"expression\s*\("),
            embedded_elements: dotall(
                r"<iframe\b[^>]*>.*?</iframe\s*>|<object\b[^>]*>.*?</object\s*>",
            ),
            void_tags: plain(r"<(embed|link|meta)\b[^>]*>"),
            quoted_handlers: plain(r#"\bon\w+\s*=\s*("[^"]*"|'[^']*')"#),
        }
    }

    /// Sanitizes a plain-text form field and trims the result.
    ///
    /// Never fails; input without flagged constructs passes through
    /// unchanged apart from trimming.
    pub fn sanitize(&self, input: &str) -> String {
        let stripped = self.fixed_point(input, |s| {
            let s = self.script_elements.replace_all(s, "");
            let s = self.script_schemes.replace_all(&s, "");
            let s = self.data_html.replace_all(&s, "");
            let s = self.event_handlers.replace_all(&s, "");
            let s = self.css_expressions.replace_all(&s, "");
            s.into_owned()
        });
        stripped.trim().to_string()
    }

    /// Sanitizes markup that will be rendered as HTML, additionally
    /// stripping embedded-content elements, `<embed>`/`<link>`/`<meta>`
    /// tags, and quoted event-handler attributes. Whitespace is kept.
    pub fn sanitize_html(&self, input: &str) -> String {
        self.fixed_point(input, |s| {
            let s = self.script_elements.replace_all(s, "");
            let s = self.embedded_elements.replace_all(&s, "");
            let s = self.void_tags.replace_all(&s, "");
            let s = self.quoted_handlers.replace_all(&s, "");
            let s = self.script_schemes.replace_all(&s, "");
            s.into_owned()
        })
    }

    fn fixed_point(&self, input: &str, pass: impl Fn(&str) -> String) -> String {
        let mut current = input.to_string();
        for _ in 0..MAX_PASSES {
            let next = pass(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
