//! CRC32C helpers, as used for record batch checksums.

/// Checksum of `data`.
pub fn crc32c(data: &[u8]) -> u32 {
    ::crc32c::crc32c(data)
}

/// Incremental CRC32C.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crc32c {
    crc: u32,
}

impl Crc32c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.crc = ::crc32c::crc32c_append(self.crc, data);
    }

    /// Feed a big-endian `i32`.
    pub fn update_int(&mut self, value: i32) {
        self.update(&value.to_be_bytes());
    }

    /// Feed a big-endian `i64`.
    pub fn update_long(&mut self, value: i64) {
        self.update(&value.to_be_bytes());
    }

    pub fn value(&self) -> u32 {
        self.crc
    }

    pub fn reset(&mut self) {
        self.crc = 0;
    }
}
