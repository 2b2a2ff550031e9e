//! Line-by-line dialogue attribution.
//!
//! Each non-empty line becomes either one narrator segment, or a narrator segment for the
//! speaker prefix followed by the attributed speech in the matched role's voice. A line is
//! never partially attributed: when no role matches, the whole line is narration.

use crate::roles::{Role, RoleRegistry};
use crate::types::Segment;
use std::sync::Arc;

/// Pause after narration lines and attributed speech
pub const DEFAULT_PAUSE_MS: u32 = 1000;

/// Punctuation that opens and closes quotations and marks colon-style attribution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueMarkers {
    pub quote_open: char,
    pub quote_close: char,
    pub colon: char,
}

impl Default for DialogueMarkers {
    fn default() -> Self {
        Self {
            quote_open: '“',
            quote_close: '”',
            colon: '：',
        }
    }
}

#[derive(Clone, Debug)]
pub struct DialogueSegmenter {
    registry: Arc<RoleRegistry>,
    markers: DialogueMarkers,
    pause_ms: u32,
}

impl DialogueSegmenter {
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self {
            registry,
            markers: DialogueMarkers::default(),
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }

    pub fn with_markers(mut self, markers: DialogueMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_pause_ms(mut self, pause_ms: u32) -> Self {
        self.pause_ms = pause_ms;
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Segment a whole document, skipping empty lines
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let segments: Vec<Segment> = text
            .lines()
            .flat_map(|line| self.segment_line(line))
            .collect();
        log::debug!(
            "Segmented {} lines into {} segments",
            text.lines().count(),
            segments.len()
        );
        segments
    }

    /// Segment a single line. Empty lines produce nothing; whitespace-only lines are
    /// narration.
    pub fn segment_line(&self, line: &str) -> Vec<Segment> {
        if line.is_empty() {
            return Vec::new();
        }

        let m = &self.markers;
        if !line.contains(m.quote_open) && !line.contains(m.colon) {
            return vec![self.narration(line)];
        }

        self.quoted(line)
            .or_else(|| self.colon_attributed(line))
            .unwrap_or_else(|| vec![self.narration(line)])
    }

    /// `prefix“speech”suffix`: exactly one quotation, suffix discarded
    fn quoted(&self, line: &str) -> Option<Vec<Segment>> {
        let m = &self.markers;
        let parts: Vec<&str> = line
            .split(|c| c == m.quote_open || c == m.quote_close)
            .collect();
        let [prefix, speech, _suffix] = parts.as_slice() else {
            return None;
        };
        let role = self.registry.lookup(prefix)?;
        Some(self.attributed(prefix.to_string(), role, speech))
    }

    /// `prefix：speech`: exactly one colon
    fn colon_attributed(&self, line: &str) -> Option<Vec<Segment>> {
        let colon = self.markers.colon;
        let parts: Vec<&str> = line.split(colon).collect();
        let [prefix, speech] = parts.as_slice() else {
            return None;
        };
        let role = self.registry.lookup(prefix)?;
        Some(self.attributed(format!("{prefix}{colon}"), role, speech))
    }

    fn attributed(&self, narration: String, role: &Role, speech: &str) -> Vec<Segment> {
        let narrator = self.registry.narrator();
        vec![
            Segment::new(&narrator.voice, &narrator.bookmark, narration),
            Segment::new(&role.voice, &role.bookmark, speech).with_pause(self.pause_ms),
        ]
    }

    fn narration(&self, line: &str) -> Segment {
        let narrator = self.registry.narrator();
        Segment::new(&narrator.voice, &narrator.bookmark, line).with_pause(self.pause_ms)
    }
}

impl Default for DialogueSegmenter {
    fn default() -> Self {
        Self::new(Arc::new(RoleRegistry::default()))
    }
}
