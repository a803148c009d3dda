//! Bounds-checked big-endian field extraction.
//!
//! Every read takes an absolute offset from the start of the event (the command
//! byte is offset 0). A read that would cross the end of the slice returns `None`,
//! and the `*_or` forms turn that into the caller's default. Older protocol
//! versions register shorter payloads, so trailing fields are routinely absent.

/// A read-only view over one event's bytes.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Wraps an event slice, command byte included.
    #[inline]
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of bytes available.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the slice is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        self.bytes.get(offset..end)?.try_into().ok()
    }

    /// Reads an unsigned byte.
    #[inline]
    #[must_use]
    pub fn u8(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Reads a signed byte.
    #[inline]
    #[must_use]
    pub fn i8(&self, offset: usize) -> Option<i8> {
        self.array(offset).map(i8::from_be_bytes)
    }

    /// Reads a big-endian `u16`.
    #[inline]
    #[must_use]
    pub fn u16(&self, offset: usize) -> Option<u16> {
        self.array(offset).map(u16::from_be_bytes)
    }

    /// Reads a big-endian `i32`.
    #[inline]
    #[must_use]
    pub fn i32(&self, offset: usize) -> Option<i32> {
        self.array(offset).map(i32::from_be_bytes)
    }

    /// Reads a big-endian IEEE-754 `f32`.
    #[inline]
    #[must_use]
    pub fn f32(&self, offset: usize) -> Option<f32> {
        self.array(offset).map(f32::from_be_bytes)
    }

    /// Reads an `f32` and truncates it toward zero.
    ///
    /// Returns `None` when the bytes are absent or the value is NaN or infinite.
    #[inline]
    #[must_use]
    pub fn f32_truncated(&self, offset: usize) -> Option<i32> {
        self.f32(offset)
            .filter(|value| value.is_finite())
            .map(|value| value as i32)
    }

    /// [`FieldReader::u8`] with a default.
    #[inline]
    #[must_use]
    pub fn u8_or(&self, offset: usize, default: u8) -> u8 {
        self.u8(offset).unwrap_or(default)
    }

    /// [`FieldReader::i8`] with a default.
    #[inline]
    #[must_use]
    pub fn i8_or(&self, offset: usize, default: i8) -> i8 {
        self.i8(offset).unwrap_or(default)
    }

    /// [`FieldReader::u16`] with a default.
    #[inline]
    #[must_use]
    pub fn u16_or(&self, offset: usize, default: u16) -> u16 {
        self.u16(offset).unwrap_or(default)
    }

    /// [`FieldReader::i32`] with a default.
    #[inline]
    #[must_use]
    pub fn i32_or(&self, offset: usize, default: i32) -> i32 {
        self.i32(offset).unwrap_or(default)
    }

    /// [`FieldReader::f32`] with a default.
    #[inline]
    #[must_use]
    pub fn f32_or(&self, offset: usize, default: f32) -> f32 {
        self.f32(offset).unwrap_or(default)
    }

    /// [`FieldReader::f32_truncated`] with a default.
    #[inline]
    #[must_use]
    pub fn f32_truncated_or(&self, offset: usize, default: i32) -> i32 {
        self.f32_truncated(offset).unwrap_or(default)
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let bytes = [0x38, 0x12, 0x34, 0xff, 0xff, 0xff, 0x85, 0x3f, 0x80, 0x00, 0x00];
        let reader = FieldReader::new(&bytes);
        assert_eq!(reader.u16(1), Some(0x1234));
        assert_eq!(reader.i32(3), Some(-123));
        assert_eq!(reader.f32(7), Some(1.0));
        assert_eq!(reader.i8(3), Some(-1));
    }

    #[test]
    fn reads_past_the_end_fall_back() {
        let bytes = [0x38, 0x01, 0x02];
        let reader = FieldReader::new(&bytes);
        assert_eq!(reader.u16(2), None);
        assert_eq!(reader.u16_or(2, 7), 7);
        assert_eq!(reader.f32_or(0, 60.0), 60.0);
        assert_eq!(reader.u8_or(usize::MAX, 9), 9);
        assert_eq!(reader.i32(usize::MAX - 1), None);
    }

    #[test]
    fn truncation_rejects_non_finite_values() {
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&f32::NAN.to_be_bytes());
        bytes.extend_from_slice(&(-3.9f32).to_be_bytes());
        let reader = FieldReader::new(&bytes);
        assert_eq!(reader.f32_truncated(1), None);
        assert_eq!(reader.f32_truncated_or(1, -1), -1);
        assert_eq!(reader.f32_truncated(5), Some(-3));
    }
}
