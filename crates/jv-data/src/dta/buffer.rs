//! Cursor over a Stata `.dta` byte image with a per-file byte order.

use jv_core::{Error, Result};

/// Byte order declared in the `<byteorder>` header tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first (`MSF`, big-endian).
    Msf,
    /// Least significant byte first (`LSF`, little-endian).
    Lsf,
}

impl ByteOrder {
    /// Parse the header tag payload.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "MSF" => Ok(Self::Msf),
            "LSF" => Ok(Self::Lsf),
            other => Err(Error::Format(format!("unknown byte order '{other}'"))),
        }
    }
}

/// A cursor-based reader over a byte slice.
pub struct DtaBuffer<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> DtaBuffer<'a> {
    /// Create a reader; the byte order can be changed once the header is read.
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self { data, pos: 0, order }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Switch byte order.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Byte order in effect.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Set read position absolutely.
    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::Format(format!(
                "seek to offset {pos} past end of file ({} bytes)",
                self.data.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a sub-slice of `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read `N` bytes into a fixed array, in file order.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let b = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_array::<2>()?;
        Ok(match self.order {
            ByteOrder::Msf => u16::from_be_bytes(b),
            ByteOrder::Lsf => u16::from_le_bytes(b),
        })
    }

    /// Read an i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_array::<4>()?;
        Ok(match self.order {
            ByteOrder::Msf => u32::from_be_bytes(b),
            ByteOrder::Lsf => u32::from_le_bytes(b),
        })
    }

    /// Read an i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_array::<8>()?;
        Ok(match self.order {
            ByteOrder::Msf => u64::from_be_bytes(b),
            ByteOrder::Lsf => u64::from_le_bytes(b),
        })
    }

    /// Read an f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a fixed-width, NUL-padded string field.
    pub fn read_fixed_str(&mut self, width: usize) -> Result<String> {
        let b = self.read_bytes(width)?;
        Ok(decode_cstr(b))
    }

    /// Consume an exact tag such as `<data>`.
    pub fn expect_tag(&mut self, tag: &str) -> Result<()> {
        let at = self.pos;
        let b = self.read_bytes(tag.len()).map_err(|_| {
            Error::Format(format!("expected tag {tag} at offset {at}, found end of file"))
        })?;
        if b != tag.as_bytes() {
            return Err(Error::Format(format!(
                "expected tag {tag} at offset {at}, found '{}'",
                String::from_utf8_lossy(b)
            )));
        }
        Ok(())
    }

    /// Whether the next bytes equal `tag` (cursor unchanged).
    pub fn peek_tag(&self, tag: &str) -> bool {
        self.data.get(self.pos..self.pos + tag.len()) == Some(tag.as_bytes())
    }

    /// Read the text between the cursor and the closing `</name>` tag.
    pub fn read_until_close(&mut self, name: &str) -> Result<&'a [u8]> {
        let close = format!("</{name}>");
        let rest = &self.data[self.pos..];
        let end = rest
            .windows(close.len())
            .position(|w| w == close.as_bytes())
            .ok_or_else(|| Error::Format(format!("missing closing tag {close}")))?;
        let out = &rest[..end];
        self.pos += end + close.len();
        Ok(out)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(Error::Format(format!(
                "unexpected end of file at offset {}: need {} bytes, have {}",
                self.pos,
                n,
                self.data.len().saturating_sub(self.pos)
            )));
        }
        Ok(())
    }
}

/// Decode a NUL-terminated field. Stata 118+ writes UTF-8; older writers used
/// Latin-1, which is mapped byte-for-byte when the bytes are not valid UTF-8.
pub fn decode_cstr(b: &[u8]) -> String {
    let end = b.iter().position(|&c| c == 0).unwrap_or(b.len());
    let b = &b[..end];
    match std::str::from_utf8(b) {
        Ok(s) => s.to_string(),
        Err(_) => b.iter().map(|&c| c as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_primitives_both_orders() {
        let le = [0x04, 0x03, 0x02, 0x01];
        let mut r = DtaBuffer::new(&le, ByteOrder::Lsf);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);

        let be = [0x01, 0x02, 0x03, 0x04];
        let mut r = DtaBuffer::new(&be, ByteOrder::Msf);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
    }

    #[test]
    fn read_f64_le() {
        let bytes = std::f64::consts::PI.to_le_bytes();
        let mut r = DtaBuffer::new(&bytes, ByteOrder::Lsf);
        assert!((r.read_f64().unwrap() - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn tags() {
        let data = b"<data>abc</data>";
        let mut r = DtaBuffer::new(data, ByteOrder::Lsf);
        assert!(r.peek_tag("<data>"));
        r.expect_tag("<data>").unwrap();
        assert_eq!(r.read_until_close("data").unwrap(), b"abc");
        assert_eq!(r.pos(), data.len());
        assert!(r.expect_tag("<x>").is_err());
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let data = b"week\0\0\0\0";
        let mut r = DtaBuffer::new(data, ByteOrder::Lsf);
        assert_eq!(r.read_fixed_str(8).unwrap(), "week");
    }

    #[test]
    fn latin1_fallback() {
        assert_eq!(decode_cstr(&[0x63, 0x61, 0x66, 0xe9]), "caf\u{e9}");
    }

    #[test]
    fn underflow_is_format_error() {
        let mut r = DtaBuffer::new(&[1, 2], ByteOrder::Lsf);
        assert!(matches!(r.read_u32(), Err(Error::Format(_))));
    }
}
