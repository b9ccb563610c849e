//! Shared helpers for in-crate unit tests.

use std::alloc::Layout;
use std::cell::Cell;
use std::io::Write;

use crate::alloc::{AllocError, Block, BlockAlloc, SystemAlloc};

/// System allocator wrapper that counts allocate/release pairs and can be
/// told to fail the next allocation.
pub struct CountingAlloc {
    inner: SystemAlloc,
    allocations: Cell<usize>,
    releases: Cell<usize>,
    fail_next: Cell<bool>,
}

impl CountingAlloc {
    pub fn new() -> Self {
        Self {
            inner: SystemAlloc,
            allocations: Cell::new(0),
            releases: Cell::new(0),
            fail_next: Cell::new(false),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    /// The next `allocate` call reports `OutOfMemory`.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }
}

impl Default for CountingAlloc {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockAlloc for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<Block, AllocError> {
        if self.fail_next.replace(false) {
            return Err(AllocError::OutOfMemory);
        }
        let block = self.inner.allocate(layout)?;
        self.allocations.set(self.allocations.get() + 1);
        Ok(block)
    }

    fn release(&self, block: Block) {
        self.releases.set(self.releases.get() + 1);
        self.inner.release(block);
    }
}

/// Builds a minimal gzip file around `payload`: fixed header with no
/// optional fields (`os = 255`), raw deflate stream, CRC32 + size footer.
pub fn gzip_bytes(payload: &[u8]) -> Vec<u8> {
    let mut file = vec![0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 255];

    let mut enc = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(payload).unwrap();
    file.extend_from_slice(&enc.finish().unwrap());

    let mut crc = flate2::Crc::new();
    crc.update(payload);
    file.extend_from_slice(&crc.sum().to_le_bytes());
    file.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    file
}
