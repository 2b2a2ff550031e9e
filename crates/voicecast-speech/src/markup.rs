//! Synthesis markup (SSML) rendering.

use crate::types::{Emphasis, Segment};
use std::borrow::Cow;
use std::fmt;

pub const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";
pub const MSTTS_NAMESPACE: &str = "https://www.w3.org/2001/mstts";
pub const DEFAULT_LANGUAGE: &str = "zh-CN";
pub const FOOTER: &str = "</speak>";

/// Root element opening a markup document
pub fn header(language: &str) -> String {
    format!(
        r#"<speak version="1.0" xmlns="{SSML_NAMESPACE}" xmlns:mstts="{MSTTS_NAMESPACE}" xml:lang="{}">"#,
        escape_markup(language)
    )
}

/// Escape markup-significant characters for text nodes and attribute values
pub fn escape_markup(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Assembled markup document. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupDocument {
    content: String,
    block_count: usize,
}

impl MarkupDocument {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Number of voice blocks, one per input segment
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn into_string(self) -> String {
        self.content
    }
}

impl fmt::Display for MarkupDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

impl AsRef<str> for MarkupDocument {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// Renders segments into voice blocks with bookmarks, emphasis and pauses
#[derive(Clone, Debug)]
pub struct MarkupAssembler {
    language: String,
    escape_text: bool,
}

impl MarkupAssembler {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            escape_text: true,
        }
    }

    /// Disable escaping to insert segment text verbatim
    pub fn with_escaping(mut self, escape_text: bool) -> Self {
        self.escape_text = escape_text;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn assemble(&self, segments: &[Segment]) -> MarkupDocument {
        let mut content = header(&self.language);
        for segment in segments {
            self.render_block(&mut content, segment);
        }
        content.push_str(FOOTER);

        MarkupDocument {
            content,
            block_count: segments.len(),
        }
    }

    fn render_block(&self, out: &mut String, segment: &Segment) {
        let text = self.text(&segment.text);
        out.push_str(&format!(
            "\n    <voice name=\"{}\">\n        <bookmark mark='{}'/>\n",
            escape_markup(&segment.voice_id),
            escape_markup(&segment.bookmark)
        ));
        match segment.emphasis {
            Emphasis::Strong => out.push_str(&format!(
                "        <emphasis level=\"strong\">{text}</emphasis>\n"
            )),
            Emphasis::None => out.push_str(&format!("        {text}\n")),
        }
        if segment.trailing_pause_ms > 0 {
            out.push_str(&format!(
                "        <break time=\"{}ms\" />\n",
                segment.trailing_pause_ms
            ));
        }
        out.push_str("    </voice>\n");
    }

    fn text<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.escape_text {
            escape_markup(raw)
        } else {
            Cow::Borrowed(raw)
        }
    }
}

impl Default for MarkupAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
