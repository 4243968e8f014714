//! Packed null bitmask.

/// Growable bitset marking absent cells, one bit per row.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8` (LSB first). A set bit
/// means the row has no value for the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullMask {
    bytes: Vec<u8>,
}

impl NullMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark row `idx` as absent.
    pub fn set(&mut self, idx: usize) {
        let byte = idx / 8;
        if self.bytes.len() <= byte {
            self.bytes.resize(byte + 1, 0);
        }
        self.bytes[byte] |= 1 << (idx % 8);
    }

    #[must_use]
    pub fn is_set(&self, idx: usize) -> bool {
        bit_is_set(&self.bytes, idx)
    }

    /// Number of rows marked absent.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Packed bytes sized for `rows` rows: exactly `ceil(rows / 8)` bytes.
    ///
    /// Bits at or beyond `rows` are dropped.
    #[must_use]
    pub fn shrink(&self, rows: usize) -> Vec<u8> {
        let mut out = vec![0u8; byte_len(rows)];
        for (dst, src) in out.iter_mut().zip(&self.bytes) {
            *dst = *src;
        }
        let tail = rows % 8;
        if tail != 0 {
            if let Some(last) = out.last_mut() {
                *last &= (1u8 << tail) - 1;
            }
        }
        out
    }
}

/// Whether bit `idx` is set in an LSB-first packed mask. Bits past the end
/// read as unset.
#[must_use]
pub fn bit_is_set(bytes: &[u8], idx: usize) -> bool {
    bytes
        .get(idx / 8)
        .is_some_and(|b| b & (1 << (idx % 8)) != 0)
}

/// Bytes needed to hold one bit per row.
#[must_use]
pub fn byte_len(rows: usize) -> usize {
    rows.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_lsb_first() {
        let mut mask = NullMask::new();
        mask.set(0);
        mask.set(2);
        assert_eq!(mask.shrink(3), vec![0b0000_0101]);
        assert!(mask.is_set(0));
        assert!(!mask.is_set(1));
        assert!(mask.is_set(2));
    }

    #[test]
    fn shrink_sizes_to_row_count() {
        let mask = NullMask::new();
        assert_eq!(mask.shrink(0), Vec::<u8>::new());
        assert_eq!(mask.shrink(8), vec![0]);
        assert_eq!(mask.shrink(9), vec![0, 0]);
    }

    #[test]
    fn set_grows_across_bytes() {
        let mut mask = NullMask::new();
        mask.set(9);
        assert_eq!(mask.shrink(10), vec![0, 0b10]);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn shrink_drops_bits_past_row_count() {
        let mut mask = NullMask::new();
        mask.set(1);
        mask.set(5);
        assert_eq!(mask.shrink(3), vec![0b10]);
    }

    #[test]
    fn packed_bits_read_back() {
        assert!(bit_is_set(&[0, 0b1000_0000], 15));
        assert!(!bit_is_set(&[0xff], 8));
    }

    #[test]
    fn byte_len_is_ceil() {
        assert_eq!(byte_len(1), 1);
        assert_eq!(byte_len(8), 1);
        assert_eq!(byte_len(17), 3);
    }
}
