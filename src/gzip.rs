//! Gzip container index: validates a byte buffer and slices it into header
//! fields and optional metadata spans without copying payload bytes.
//!
//! Container layout (RFC 1952, all integers little-endian):
//! fixed 10-byte header, then optional extra / name / comment / header-CRC
//! fields gated by the flag bits, then the raw DEFLATE payload, then an
//! 8-byte footer (CRC32 + size mod 2^32).
//!
//! # Invariants
//! - Parsing never reads or slices past the end of the input; hostile
//!   lengths and missing terminators fail with [`ParseError::Truncated`].
//! - Parsing fails fast: no partial index is ever returned.
//! - The index borrows the caller's buffer; the buffer must stay alive and
//!   unmodified for the index's lifetime (enforced by the borrow).
//!
//! # Design Notes
//! - The extra-field length is read at the current cursor position, like
//!   every other field.
//! - `name`/`comment` are Latin-1 byte spans, not UTF-8; they are exposed
//!   as raw bytes with the NUL terminator excluded.
//! - `footer` stays zeroed until a successful inflate fills it in.

use std::fmt;

use crate::cursor::ByteCursor;

/// Magic bytes opening every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The only compression method this crate supports (raw DEFLATE).
pub const METHOD_DEFLATE: u8 = 8;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 10;

/// Trailing footer size in bytes: CRC32 + size mod 2^32.
pub const FOOTER_SIZE: usize = 8;

/// Hints that the payload is text.
pub const FLAG_TEXT: u8 = 0x01;
/// 16-bit header CRC present immediately before the compressed data.
pub const FLAG_HCRC: u8 = 0x02;
/// "Extra" field present after the fixed header.
pub const FLAG_EXTRA: u8 = 0x04;
/// NUL-terminated original file name present after any extra field.
pub const FLAG_NAME: u8 = 0x08;
/// NUL-terminated comment present after the name field.
pub const FLAG_COMMENT: u8 = 0x10;

/// Deflate extra-flags hint: compressor used maximum compression.
pub const XFL_BEST: u8 = 0x02;
/// Deflate extra-flags hint: compressor used fastest compression.
pub const XFL_FASTEST: u8 = 0x04;

/// True if the buffer begins with the gzip magic bytes.
#[inline(always)]
pub fn is_gzip_magic(buf: &[u8]) -> bool {
    buf.len() >= 2 && buf[0] == GZIP_MAGIC[0] && buf[1] == GZIP_MAGIC[1]
}

/// Originating filesystem / OS identifier from the fixed header.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsId {
    Fat = 0,
    Amiga = 1,
    Vms = 2,
    Unix = 3,
    VmCms = 4,
    AtariTos = 5,
    Hpfs = 6,
    Macintosh = 7,
    ZSystem = 8,
    Cpm = 9,
    Tops20 = 10,
    Ntfs = 11,
    Qdos = 12,
    AcornRiscos = 13,
    Unknown = 255,
}

impl OsId {
    /// Maps a header byte to a known OS identifier. Values outside the
    /// registered set (including 255 itself) map to `Unknown`.
    pub const fn from_u8(value: u8) -> OsId {
        match value {
            0 => Self::Fat,
            1 => Self::Amiga,
            2 => Self::Vms,
            3 => Self::Unix,
            4 => Self::VmCms,
            5 => Self::AtariTos,
            6 => Self::Hpfs,
            7 => Self::Macintosh,
            8 => Self::ZSystem,
            9 => Self::Cpm,
            10 => Self::Tops20,
            11 => Self::Ntfs,
            12 => Self::Qdos,
            13 => Self::AcornRiscos,
            _ => Self::Unknown,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Fat => "fat",
            Self::Amiga => "amiga",
            Self::Vms => "vms",
            Self::Unix => "unix",
            Self::VmCms => "vm/cms",
            Self::AtariTos => "atari_tos",
            Self::Hpfs => "hpfs",
            Self::Macintosh => "macintosh",
            Self::ZSystem => "z-system",
            Self::Cpm => "cp/m",
            Self::Tops20 => "tops-20",
            Self::Ntfs => "ntfs",
            Self::Qdos => "qdos",
            Self::AcornRiscos => "acorn_riscos",
            Self::Unknown => "unknown",
        }
    }
}

/// Copy of the fixed 10-byte gzip header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GzipHeader {
    /// Magic value, little-endian `0x8b1f`. Validated before the copy.
    pub magic: u16,
    /// Compression method; always [`METHOD_DEFLATE`] after a successful parse.
    pub method: u8,
    /// Flag bitfield; see the `FLAG_*` constants.
    pub flags: u8,
    /// Modification time, seconds since the Unix epoch. Zero if unset.
    pub mtime: u32,
    /// Compression hints; see `XFL_BEST` / `XFL_FASTEST`.
    pub extra_flags: u8,
    /// Originating OS byte; see [`GzipHeader::os_id`].
    pub os: u8,
}

impl GzipHeader {
    #[inline]
    pub fn is_text(&self) -> bool {
        self.flags & FLAG_TEXT != 0
    }

    #[inline]
    pub fn has_header_crc(&self) -> bool {
        self.flags & FLAG_HCRC != 0
    }

    #[inline]
    pub fn has_extra(&self) -> bool {
        self.flags & FLAG_EXTRA != 0
    }

    #[inline]
    pub fn has_name(&self) -> bool {
        self.flags & FLAG_NAME != 0
    }

    #[inline]
    pub fn has_comment(&self) -> bool {
        self.flags & FLAG_COMMENT != 0
    }

    #[inline]
    pub fn os_id(&self) -> OsId {
        OsId::from_u8(self.os)
    }
}

/// Trailing 8-byte footer: CRC32 of the decompressed data and the
/// decompressed size modulo 2^32.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GzipFooter {
    pub crc: u32,
    pub size: u32,
}

/// Parse error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Not enough bytes for a required or declared field.
    Truncated,
    /// The buffer does not start with the gzip magic bytes.
    MagicMismatch,
    /// Compression method other than DEFLATE.
    UnsupportedCompression(u8),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated gzip container"),
            Self::MagicMismatch => write!(f, "bad gzip magic"),
            Self::UnsupportedCompression(m) => write!(f, "unsupported compression method {m}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Non-destructive index over one gzip member.
///
/// All spans borrow from the caller's buffer; the caller must keep it alive
/// and unmodified for as long as the index (and any inflate run over it).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GzipIndex<'a> {
    /// The original buffer the index was parsed from.
    pub buffer: &'a [u8],
    /// Copy of the fixed header.
    pub header: GzipHeader,
    /// Extra field bytes, if the EXTRA flag was set. May be empty.
    pub extra: Option<&'a [u8]>,
    /// Original file name (Latin-1, NUL excluded), if the NAME flag was set.
    pub name: Option<&'a [u8]>,
    /// Comment (Latin-1, NUL excluded), if the COMMENT flag was set.
    pub comment: Option<&'a [u8]>,
    /// 16-bit header CRC, present iff the HCRC flag was set.
    pub header_crc: Option<u16>,
    /// Compressed payload plus the 8-byte footer.
    pub rest: &'a [u8],
    /// Zeroed until a successful [`crate::inflate::inflate`] fills it in.
    pub footer: GzipFooter,
}

impl<'a> GzipIndex<'a> {
    /// Validates `buffer` as a single gzip member and slices it into an
    /// index. Nothing is copied except the fixed header.
    pub fn parse(buffer: &'a [u8]) -> Result<Self, ParseError> {
        if buffer.len() < HEADER_SIZE {
            return Err(ParseError::Truncated);
        }
        if !is_gzip_magic(buffer) {
            return Err(ParseError::MagicMismatch);
        }
        if buffer[2] != METHOD_DEFLATE {
            return Err(ParseError::UnsupportedCompression(buffer[2]));
        }

        let mut cur = ByteCursor::new(buffer);
        // The fixed header is present: length was checked above.
        let header = GzipHeader {
            magic: cur.read_u16_le().ok_or(ParseError::Truncated)?,
            method: cur.read_u8().ok_or(ParseError::Truncated)?,
            flags: cur.read_u8().ok_or(ParseError::Truncated)?,
            mtime: cur.read_u32_le().ok_or(ParseError::Truncated)?,
            extra_flags: cur.read_u8().ok_or(ParseError::Truncated)?,
            os: cur.read_u8().ok_or(ParseError::Truncated)?,
        };

        let extra = if header.has_extra() {
            let len = cur.read_u16_le().ok_or(ParseError::Truncated)?;
            Some(cur.take(len as usize).ok_or(ParseError::Truncated)?)
        } else {
            None
        };

        let name = if header.has_name() {
            Some(cur.take_until_nul().ok_or(ParseError::Truncated)?)
        } else {
            None
        };

        let comment = if header.has_comment() {
            Some(cur.take_until_nul().ok_or(ParseError::Truncated)?)
        } else {
            None
        };

        let header_crc = if header.has_header_crc() {
            Some(cur.read_u16_le().ok_or(ParseError::Truncated)?)
        } else {
            None
        };

        let rest = cur.rest();
        // No room left for payload + footer.
        if rest.is_empty() {
            return Err(ParseError::Truncated);
        }

        Ok(Self {
            buffer,
            header,
            extra,
            name,
            comment,
            header_crc,
            rest,
            footer: GzipFooter::default(),
        })
    }
}
