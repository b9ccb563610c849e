//! Gzip container indexing and streaming inflation over caller-owned byte buffers.
//!
//! ## Scope
//! This crate parses the gzip container format (RFC 1952) from an
//! already-obtained byte buffer and drives a raw-DEFLATE decompressor over the
//! indexed payload into a growable, allocator-parameterized output buffer. It
//! does not encode gzip, does not support multi-member streams, and performs
//! no file I/O; the caller supplies the bytes (for example from a mapped
//! file) and keeps them alive.
//!
//! ## Key invariants
//! - Parsing never reads or slices past the end of the input; every field
//!   advance is bounds-checked *before* the read via [`cursor::ByteCursor`].
//! - [`gzip::GzipIndex`] borrows from the caller's buffer and copies nothing
//!   but the fixed header; the borrow checker enforces the lifetime contract.
//! - Inflation either returns a fully valid output buffer or a discriminated
//!   error; no path leaves partially decompressed output observable.
//! - Output-buffer growth preserves all already-produced bytes and releases
//!   the old block through the same allocator that produced it.
//! - The decompressed CRC32 is verified against the container footer before
//!   the result becomes observable.
//!
//! ## Flow (single buffer)
//! 1) [`gzip::GzipIndex::parse`] validates and slices the container into
//!    header fields, optional metadata spans, and the payload+footer span.
//! 2) [`inflate::inflate`] decompresses the payload into a
//!    [`grow_buf::GrowBuf`] backed by a caller-chosen [`alloc::BlockAlloc`],
//!    doubling the buffer on demand, and fills in the index footer.
//!
//! ## Notable entry points
//! - [`gzip::GzipIndex::parse`] / [`gzip::is_gzip_magic`]: container parsing.
//! - [`inflate::inflate`]: payload decompression.
//! - [`grow_buf::GrowBuf`] / [`grow_buf::GrowthPolicy`]: reusable growable
//!   buffer primitive.
//! - [`alloc::SystemAlloc`]: default allocator capability.

pub mod alloc;
pub mod cursor;
pub mod grow_buf;
pub mod gzip;
pub mod inflate;
#[cfg(test)]
pub mod test_utils;

pub use alloc::{AllocError, Block, BlockAlloc, SystemAlloc, SYSTEM};
pub use cursor::ByteCursor;
pub use grow_buf::{GrowBuf, GrowthPolicy};
pub use gzip::{GzipFooter, GzipHeader, GzipIndex, OsId, ParseError};
pub use inflate::{inflate, InflateError};
