//! Streaming inflate driver over an indexed gzip payload.
//!
//! Drives a raw-DEFLATE decompressor across `index.rest`, writing directly
//! into a [`GrowBuf`]'s spare capacity and doubling the buffer whenever the
//! decompressor runs out of output space. On success the trailing footer is
//! recovered from the bytes after the stream and the decompressed CRC32 is
//! verified against it.
//!
//! # Invariants
//! - Every exit is either a fully valid result or a discriminated error; no
//!   path returns a partially populated buffer.
//! - `index.footer` becomes observable only after every check (footer
//!   bounds, CRC32) has passed; on error it stays zeroed.
//! - Buffer growth preserves all bytes produced so far.
//! - The loop terminates on every decompressor status: stream end and decode
//!   errors break out, exhausted input fails, and exhausted output grows the
//!   buffer before the next step.
//!
//! # Design Notes
//! - The container header was already consumed by the parser, so the stream
//!   is opened without zlib/gzip header parsing.
//! - Initial output capacity is `2 * rest.len()`: an amortization guess, not
//!   a correctness requirement; under-estimation is corrected by growth.
//! - Allocation failures are reported distinctly from data errors so callers
//!   can tell resource exhaustion from corruption.

use std::fmt;

use flate2::{Crc, Decompress, FlushDecompress};

use crate::alloc::{AllocError, BlockAlloc};
use crate::grow_buf::GrowBuf;
use crate::gzip::{GzipFooter, GzipIndex, FOOTER_SIZE};

/// Inflate error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InflateError {
    /// The decompressor reported a decode error, or stopped making progress
    /// with both input and output space available. Counts cover the bytes
    /// consumed and produced before the failure.
    CorruptStream { bytes_in: u64, bytes_out: u64 },
    /// Input ran out before the stream completed.
    TruncatedStream,
    /// The final stream step failed after data was produced.
    FinalizeError,
    /// The 8-byte footer does not fit after the compressed stream.
    FooterMissing,
    /// CRC32 of the decompressed data does not match the footer.
    MismatchedChecksum { expected: u32, computed: u32 },
    /// Output-buffer growth failed.
    Alloc(AllocError),
}

impl fmt::Display for InflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorruptStream {
                bytes_in,
                bytes_out,
            } => write!(f, "corrupt deflate stream (in:{bytes_in} out:{bytes_out})"),
            Self::TruncatedStream => write!(f, "truncated deflate stream"),
            Self::FinalizeError => write!(f, "deflate stream finalization failed"),
            Self::FooterMissing => write!(f, "no room for gzip footer"),
            Self::MismatchedChecksum { expected, computed } => write!(
                f,
                "checksum mismatch (footer:{expected:#010x} computed:{computed:#010x})"
            ),
            Self::Alloc(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for InflateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for InflateError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

/// Decompresses the indexed payload into a buffer allocated from `alloc`.
///
/// On success the returned buffer holds exactly the decompressed bytes and
/// `index.footer` carries the recovered CRC32 and size. On any error the
/// footer stays zeroed and no output is observable.
///
/// A `rest` of only the footer (or less) fails with `TruncatedStream`: even
/// an empty input deflates to a nonempty stored block, so a zero-length
/// payload can never reach stream end.
pub fn inflate<'al, A: BlockAlloc + ?Sized>(
    index: &mut GzipIndex<'_>,
    alloc: &'al A,
) -> Result<GrowBuf<'al, u8, A>, InflateError> {
    let rest = index.rest;
    if rest.len() <= FOOTER_SIZE {
        return Err(InflateError::TruncatedStream);
    }

    let mut out: GrowBuf<'al, u8, A> = GrowBuf::new_in(alloc);
    out.ensure_capacity(rest.len().saturating_mul(2))?;

    // Raw deflate: the container header was consumed by the parser, and the
    // footer bytes trailing the stream are ignored by the decompressor.
    let mut stream = Decompress::new(false);
    let mut in_pos = 0usize;

    loop {
        if out.len() == out.capacity() {
            out.ensure_capacity(out.capacity().saturating_mul(2))?;
        }

        let before_in = stream.total_in();
        let before_out = stream.total_out();

        let status = stream
            .decompress(&rest[in_pos..], out.spare_bytes_mut(), FlushDecompress::Sync)
            .map_err(|_| InflateError::CorruptStream {
                bytes_in: stream.total_in(),
                bytes_out: stream.total_out(),
            })?;

        let consumed = (stream.total_in() - before_in) as usize;
        let produced = (stream.total_out() - before_out) as usize;
        in_pos += consumed;
        out.advance(produced);

        match status {
            flate2::Status::StreamEnd => break,
            flate2::Status::Ok | flate2::Status::BufError => {
                if consumed == 0 && produced == 0 {
                    if in_pos >= rest.len() {
                        return Err(InflateError::TruncatedStream);
                    }
                    if out.len() < out.capacity() {
                        // Input and output space available but no forward
                        // progress: the stream cannot be completed.
                        return Err(InflateError::CorruptStream {
                            bytes_in: stream.total_in(),
                            bytes_out: stream.total_out(),
                        });
                    }
                    // Output full: grown at the top of the loop.
                }
            }
        }
    }

    // The stream ended; a final no-op step surfaces any end-of-stream
    // bookkeeping failure instead of discarding it.
    if stream
        .decompress(&[], &mut [], FlushDecompress::Finish)
        .is_err()
    {
        return Err(InflateError::FinalizeError);
    }

    // Trim to the exact byte count produced.
    let total_out = stream.total_out() as usize;
    out.truncate(total_out);

    let footer_start = stream.total_in() as usize;
    let footer_end = footer_start
        .checked_add(FOOTER_SIZE)
        .ok_or(InflateError::FooterMissing)?;
    let bytes = rest
        .get(footer_start..footer_end)
        .ok_or(InflateError::FooterMissing)?;
    let footer = GzipFooter {
        crc: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    };

    let mut crc = Crc::new();
    crc.update(out.as_slice());
    let computed = crc.sum();
    if computed != footer.crc {
        return Err(InflateError::MismatchedChecksum {
            expected: footer.crc,
            computed,
        });
    }

    index.footer = footer;
    Ok(out)
}
