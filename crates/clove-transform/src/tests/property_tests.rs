//! Property-based tests for edit application.
//!
//! Run with: cargo test --features proptest --package clove-transform property_tests

#![cfg(feature = "proptest")]

use proptest::prelude::*;

use crate::{Edit, apply_edits};

/// ASCII source plus a set of non-overlapping edits over it.
fn source_and_edits() -> impl Strategy<Value = (String, Vec<Edit>)> {
    "[a-z \n]{0,64}".prop_flat_map(|source| {
        let len = source.len() as u32;
        let edits = prop::collection::vec((0..=len, 0..=len, "[A-Z]{0,4}"), 0..6).prop_map(
            |raw| {
                let mut edits: Vec<Edit> = Vec::new();
                let mut taken: Vec<(u32, u32)> = Vec::new();
                for (a, b, text) in raw {
                    let (start, end) = (a.min(b), a.max(b));
                    // keep only edits disjoint from the ones already chosen
                    if taken.iter().all(|&(s, e)| end <= s || start >= e) {
                        taken.push((start, end));
                        edits.push(Edit {
                            start,
                            end,
                            replacement: text,
                        });
                    }
                }
                edits
            },
        );
        (Just(source), edits)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Unchanged segments carry identical text on both sides.
    #[test]
    fn prop_segments_preserve_text((source, edits) in source_and_edits()) {
        let edited = apply_edits(&source, edits.clone()).unwrap();
        for segment in edited.offsets.segments() {
            let generated = &edited.code[segment.generated as usize..(segment.generated + segment.len) as usize];
            let original = &source[segment.original as usize..(segment.original + segment.len) as usize];
            prop_assert_eq!(generated, original);
        }

        let removed: u32 = edits.iter().map(|e| e.end - e.start).sum();
        let added: usize = edits.iter().map(|e| e.replacement.len()).sum();
        prop_assert_eq!(edited.code.len(), source.len() - removed as usize + added);
    }

    /// Offsets map back and forth inside unchanged text.
    #[test]
    fn prop_offsets_round_trip((source, edits) in source_and_edits()) {
        let edited = apply_edits(&source, edits).unwrap();
        for segment in edited.offsets.segments() {
            for delta in 0..segment.len {
                let generated = segment.generated + delta;
                let original = edited.offsets.to_original(generated).unwrap();
                prop_assert_eq!(original, segment.original + delta);
                prop_assert_eq!(edited.offsets.to_generated(original), Some(generated));
            }
        }
    }
}
