//! Gzip file construction helpers for property tests.

use std::io::Write;

/// Optional-field configuration for a generated gzip file.
#[derive(Clone, Debug, Default)]
pub struct FileSpec {
    pub payload: Vec<u8>,
    /// NUL-free name bytes, terminator added by the builder.
    pub name: Option<Vec<u8>>,
    /// NUL-free comment bytes, terminator added by the builder.
    pub comment: Option<Vec<u8>>,
    pub extra: Option<Vec<u8>>,
    pub header_crc: Option<u16>,
}

impl FileSpec {
    /// Builds the file. Returns the bytes and the offset where the
    /// compressed payload begins (header plus all optional fields).
    pub fn build(&self) -> (Vec<u8>, usize) {
        let mut flags = 0u8;
        if self.header_crc.is_some() {
            flags |= 0x02;
        }
        if self.extra.is_some() {
            flags |= 0x04;
        }
        if self.name.is_some() {
            flags |= 0x08;
        }
        if self.comment.is_some() {
            flags |= 0x10;
        }

        let mut file = vec![0x1f, 0x8b, 8, flags, 0, 0, 0, 0, 0, 255];
        if let Some(extra) = &self.extra {
            file.extend_from_slice(&(extra.len() as u16).to_le_bytes());
            file.extend_from_slice(extra);
        }
        if let Some(name) = &self.name {
            file.extend_from_slice(name);
            file.push(0);
        }
        if let Some(comment) = &self.comment {
            file.extend_from_slice(comment);
            file.push(0);
        }
        if let Some(crc) = self.header_crc {
            file.extend_from_slice(&crc.to_le_bytes());
        }
        let meta_len = file.len();

        let mut enc =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&self.payload).unwrap();
        file.extend_from_slice(&enc.finish().unwrap());

        let mut crc = flate2::Crc::new();
        crc.update(&self.payload);
        file.extend_from_slice(&crc.sum().to_le_bytes());
        file.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());

        (file, meta_len)
    }
}
