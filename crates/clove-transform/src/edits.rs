//! Edit Application: ordered text replacements with an offset map back to
//! the original source.

use thiserror::Error;

use clove_graph::SourceSpan;

/// Replace `[start, end)` with `replacement`. `start == end` inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: SourceSpan, replacement: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }

    pub fn delete(span: SourceSpan) -> Self {
        Self::replace(span, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("overlapping edits: [{}, {}) and [{}, {})", .first.0, .first.1, .second.0, .second.1)]
    Overlapping { first: (u32, u32), second: (u32, u32) },

    #[error("edit [{start}, {end}) is outside the source (length {len}) or splits a character")]
    OutOfBounds { start: u32, end: u32, len: u32 },
}

/// A run of unchanged text present in both the original and generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub generated: u32,
    pub original: u32,
    pub len: u32,
}

/// Monotonic mapping of unchanged segments between generated and original offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    segments: Vec<Segment>,
}

impl OffsetMap {
    pub fn identity(len: u32) -> Self {
        let segments = if len == 0 {
            Vec::new()
        } else {
            vec![Segment {
                generated: 0,
                original: 0,
                len,
            }]
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Original offset of a generated offset inside unchanged text.
    pub fn to_original(&self, generated: u32) -> Option<u32> {
        let idx = self
            .segments
            .partition_point(|segment| segment.generated + segment.len <= generated);
        let segment = self.segments.get(idx)?;
        (segment.generated <= generated).then(|| segment.original + (generated - segment.generated))
    }

    /// Generated offset of an original offset inside unchanged text.
    pub fn to_generated(&self, original: u32) -> Option<u32> {
        let idx = self
            .segments
            .partition_point(|segment| segment.original + segment.len <= original);
        let segment = self.segments.get(idx)?;
        (segment.original <= original).then(|| segment.generated + (original - segment.original))
    }

    fn push(&mut self, generated: u32, original: u32, len: u32) {
        if len > 0 {
            self.segments.push(Segment {
                generated,
                original,
                len,
            });
        }
    }
}

/// Rewritten text plus its offset mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedText {
    pub code: String,
    pub offsets: OffsetMap,
}

/// Apply `edits` to `source`.
///
/// Edits are stably sorted by `(start, end)`, so insertions at the same offset
/// keep their relative order. Any edit starting before the previous one ends
/// is rejected.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<EditedText, EditError> {
    let len = source.len() as u32;
    edits.sort_by_key(|edit| (edit.start, edit.end));

    for edit in &edits {
        if edit.start > edit.end
            || edit.end > len
            || !source.is_char_boundary(edit.start as usize)
            || !source.is_char_boundary(edit.end as usize)
        {
            return Err(EditError::OutOfBounds {
                start: edit.start,
                end: edit.end,
                len,
            });
        }
    }
    for pair in edits.windows(2) {
        if pair[0].end > pair[1].start {
            return Err(EditError::Overlapping {
                first: (pair[0].start, pair[0].end),
                second: (pair[1].start, pair[1].end),
            });
        }
    }

    let added: usize = edits.iter().map(|edit| edit.replacement.len()).sum();
    let mut code = String::with_capacity(source.len() + added);
    let mut offsets = OffsetMap::default();
    let mut cursor = 0u32;

    for edit in &edits {
        if edit.start > cursor {
            offsets.push(code.len() as u32, cursor, edit.start - cursor);
            code.push_str(&source[cursor as usize..edit.start as usize]);
        }
        code.push_str(&edit.replacement);
        cursor = cursor.max(edit.end);
    }
    if cursor < len {
        offsets.push(code.len() as u32, cursor, len - cursor);
        code.push_str(&source[cursor as usize..]);
    }

    Ok(EditedText { code, offsets })
}
