//! Fixed-width field decoding for binary grid headers and node records.

/// Byte order of a binary grid file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    #[inline]
    pub fn i32_at(self, buf: &[u8], offset: usize) -> Option<i32> {
        let bytes: [u8; 4] = buf.get(offset..offset + 4)?.try_into().ok()?;
        Some(match self {
            Self::Little => i32::from_le_bytes(bytes),
            Self::Big => i32::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn f32_at(self, buf: &[u8], offset: usize) -> Option<f32> {
        let bytes: [u8; 4] = buf.get(offset..offset + 4)?.try_into().ok()?;
        Some(match self {
            Self::Little => f32::from_le_bytes(bytes),
            Self::Big => f32::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn f64_at(self, buf: &[u8], offset: usize) -> Option<f64> {
        let bytes: [u8; 8] = buf.get(offset..offset + 8)?.try_into().ok()?;
        Some(match self {
            Self::Little => f64::from_le_bytes(bytes),
            Self::Big => f64::from_be_bytes(bytes),
        })
    }
}

/// Reads a space-padded ASCII field, trimmed.
pub fn label_at(buf: &[u8], offset: usize, len: usize) -> Option<String> {
    let raw = buf.get(offset..offset + len)?;
    Some(
        String::from_utf8_lossy(raw)
            .trim_end_matches(['\0', ' '])
            .trim()
            .to_string(),
    )
}
