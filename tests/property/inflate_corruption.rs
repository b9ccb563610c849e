//! Corruption soundness for the inflate engine: flipped payload bits must
//! surface as errors, never as silently wrong output.

use proptest::prelude::*;

use gzidx::{inflate, GzipIndex, SYSTEM};

use crate::util::FileSpec;

/// Flip one bit and run the full pipeline. The only acceptable outcomes are
/// a discriminated error or byte-exact output (a flip can land in bits the
/// decoder never reads, such as padding after the final block).
fn check_flipped(file: &[u8], payload: &[u8], byte: usize, bit: u8) {
    let mut corrupt = file.to_vec();
    corrupt[byte] ^= 1 << bit;

    match GzipIndex::parse(&corrupt) {
        Err(_) => {}
        Ok(mut index) => match inflate(&mut index, &SYSTEM) {
            Err(_) => {}
            Ok(out) => assert_eq!(
                out.as_slice(),
                payload,
                "flip at byte {byte} bit {bit} produced wrong output"
            ),
        },
    }
}

#[test]
fn every_payload_bit_flip_is_detected() {
    let payload = b"hello world";
    let (file, meta_len) = FileSpec {
        payload: payload.to_vec(),
        ..FileSpec::default()
    }
    .build();

    // Exhaustive over the compressed payload region.
    for byte in meta_len..file.len() - 8 {
        for bit in 0..8 {
            check_flipped(&file, payload, byte, bit);
        }
    }
}

#[test]
fn every_footer_crc_bit_flip_is_detected() {
    let payload = b"hello world";
    let (file, _) = FileSpec {
        payload: payload.to_vec(),
        ..FileSpec::default()
    }
    .build();

    // Any flip in the stored CRC32 must be a checksum mismatch.
    for byte in file.len() - 8..file.len() - 4 {
        for bit in 0..8 {
            let mut corrupt = file.clone();
            corrupt[byte] ^= 1 << bit;
            let mut index = GzipIndex::parse(&corrupt).unwrap();
            assert!(
                matches!(
                    inflate(&mut index, &SYSTEM),
                    Err(gzidx::InflateError::MismatchedChecksum { .. })
                ),
                "flip at byte {byte} bit {bit}"
            );
        }
    }
}

proptest! {
    #[test]
    fn random_payload_bit_flips_are_detected(
        payload in prop::collection::vec(any::<u8>(), 1..=2048),
        selector in any::<(usize, u8)>(),
    ) {
        let (file, meta_len) = FileSpec {
            payload: payload.clone(),
            ..FileSpec::default()
        }
        .build();

        let region = meta_len..file.len() - 8;
        let byte = region.start + selector.0 % region.len();
        let bit = selector.1 % 8;
        check_flipped(&file, &payload, byte, bit);
    }
}
