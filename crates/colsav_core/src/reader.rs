use crate::error::FormatError;

/// Bounds-checked little-endian access into a borrowed save buffer.
///
/// Every read names the section it belongs to so a truncated file reports
/// which table ran off the end.
#[derive(Debug, Clone, Copy)]
pub struct LittleEndianSlice<'a> {
    bytes: &'a [u8],
}

impl<'a> LittleEndianSlice<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn read_u8(&self, offset: usize, section: &'static str) -> Result<u8, FormatError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(section, offset + 1))
    }

    pub fn read_u16(&self, offset: usize, section: &'static str) -> Result<u16, FormatError> {
        let raw = self.read_array::<2>(offset, section)?;
        Ok(u16::from_le_bytes(raw))
    }

    pub fn read_array<const N: usize>(
        &self,
        offset: usize,
        section: &'static str,
    ) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(offset, N, section)?);
        Ok(out)
    }

    pub fn read_bytes(
        &self,
        offset: usize,
        n: usize,
        section: &'static str,
    ) -> Result<&'a [u8], FormatError> {
        let end = offset
            .checked_add(n)
            .ok_or_else(|| self.truncated(section, usize::MAX))?;
        self.bytes
            .get(offset..end)
            .ok_or_else(|| self.truncated(section, end))
    }

    /// Read a fixed-width field holding a NUL-terminated string. Bytes after
    /// the first NUL are ignored; non-ASCII bytes are mapped through Latin-1.
    pub fn read_fixed_string(
        &self,
        offset: usize,
        n: usize,
        section: &'static str,
    ) -> Result<String, FormatError> {
        let raw = self.read_bytes(offset, n, section)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(n);
        Ok(raw[..end].iter().map(|&b| char::from(b)).collect())
    }

    pub fn require(&self, end: usize, section: &'static str) -> Result<(), FormatError> {
        if end > self.bytes.len() {
            return Err(self.truncated(section, end));
        }
        Ok(())
    }

    fn truncated(&self, section: &'static str, need: usize) -> FormatError {
        FormatError::Truncated {
            section,
            need,
            have: self.bytes.len(),
        }
    }
}
