//! Source map derivation from the edit offset map.

use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use clove_graph::LineIndex;

use crate::edits::OffsetMap;

/// Build a source map with one token at the start of each unchanged segment
/// and at each line start inside it.
pub fn build_source_map(
    source_name: &str,
    original: &str,
    generated: &str,
    offsets: &OffsetMap,
) -> SourceMap {
    let mut builder = SourceMapBuilder::default();
    let source_id = builder.add_source_and_content(source_name, original);
    let original_lines = LineIndex::new(original);
    let generated_lines = LineIndex::new(generated);

    let add = |builder: &mut SourceMapBuilder, generated_offset: u32, original_offset: u32| {
        let (dst_line, dst_col) = generated_lines.line_column(generated_offset, generated);
        let (src_line, src_col) = original_lines.line_column(original_offset, original);
        builder.add_token(
            dst_line - 1,
            dst_col,
            src_line - 1,
            src_col,
            Some(source_id),
            None,
        );
    };

    for segment in offsets.segments() {
        add(&mut builder, segment.generated, segment.original);

        let start = segment.original as usize;
        let end = start + segment.len as usize;
        let Some(text) = original.get(start..end) else {
            continue;
        };
        for (idx, byte) in text.bytes().enumerate() {
            let next = idx as u32 + 1;
            if byte == b'\n' && next < segment.len {
                add(&mut builder, segment.generated + next, segment.original + next);
            }
        }
    }

    builder.into_sourcemap()
}
