//! Truncation and garbage-input soundness for the container parser.

use proptest::prelude::*;

use gzidx::{inflate, GzipIndex, ParseError, SYSTEM};

use crate::util::FileSpec;

fn nul_free_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=255, 0..=max_len)
}

fn file_spec() -> impl Strategy<Value = FileSpec> {
    (
        prop::collection::vec(any::<u8>(), 0..=256),
        prop::option::of(nul_free_bytes(24)),
        prop::option::of(nul_free_bytes(24)),
        prop::option::of(prop::collection::vec(any::<u8>(), 0..=24)),
        prop::option::of(any::<u16>()),
    )
        .prop_map(|(payload, name, comment, extra, header_crc)| FileSpec {
            payload,
            name,
            comment,
            extra,
            header_crc,
        })
}

proptest! {
    /// Every truncation within the header or an optional field fails with
    /// `Truncated`; truncation inside the payload parses but never inflates
    /// to a silent success. No input length panics or reads out of bounds.
    #[test]
    fn any_truncation_fails_cleanly(spec in file_spec()) {
        let (file, meta_len) = spec.build();

        for cut in 0..file.len() {
            match GzipIndex::parse(&file[..cut]) {
                Err(err) => {
                    // Structural prefixes only ever fail as truncated.
                    prop_assert_eq!(err, ParseError::Truncated);
                    prop_assert!(
                        cut <= meta_len,
                        "cut {} inside payload parsed as truncated header",
                        cut
                    );
                }
                Ok(mut index) => {
                    prop_assert!(cut > meta_len);
                    // The payload (and possibly footer) is cut short, so
                    // inflation must report an error, not partial output.
                    prop_assert!(inflate(&mut index, &SYSTEM).is_err());
                }
            }
        }

        // The untruncated file round-trips.
        let mut index = GzipIndex::parse(&file).unwrap();
        prop_assert_eq!(index.name.map(|s| s.to_vec()), spec.name);
        prop_assert_eq!(index.comment.map(|s| s.to_vec()), spec.comment);
        prop_assert_eq!(index.extra.map(|s| s.to_vec()), spec.extra);
        prop_assert_eq!(index.header_crc, spec.header_crc);
        let out = inflate(&mut index, &SYSTEM).unwrap();
        prop_assert_eq!(out.as_slice(), &spec.payload[..]);
        prop_assert_eq!(index.footer.size as usize, spec.payload.len());
    }

    /// Arbitrary byte soup never panics the parser, and anything it accepts
    /// never panics the inflate engine.
    #[test]
    fn garbage_input_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..=512)) {
        if let Ok(mut index) = GzipIndex::parse(&bytes) {
            let _ = inflate(&mut index, &SYSTEM);
        }
    }
}
