// Bitfield packing helpers
// A bitfield is one payload byte whose bits are independent boolean flags

/// Extract the flag at `bit` (0 = least significant) from a bitfield byte
pub fn unpack_bit(byte: u8, bit: u8) -> bool {
    (byte >> bit) & 1 == 1
}

/// Pack a set of (bit, flag) pairs into one byte
///
/// Undeclared bits stay zero. Each flag controls only its own bit, so the
/// order of the pairs never changes the result.
pub fn pack_bits(flags: impl IntoIterator<Item = (u8, bool)>) -> u8 {
    let mut byte = 0u8;
    for (bit, set) in flags {
        if set {
            byte |= 1 << bit;
        }
    }
    byte
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bit() {
        assert_eq!(pack_bits([(3, true)]), 0x08);
        assert_eq!(pack_bits([(0, true)]), 0x01);
        assert_eq!(pack_bits([(7, true)]), 0x80);
    }

    #[test]
    fn test_unpack_independence() {
        let byte = 0x0A;
        assert!(!unpack_bit(byte, 0));
        assert!(unpack_bit(byte, 1));
        assert!(!unpack_bit(byte, 2));
        assert!(unpack_bit(byte, 3));
        for bit in 4..8 {
            assert!(!unpack_bit(byte, bit));
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let forward = pack_bits([(1, true), (3, true), (6, true)]);
        let reverse = pack_bits([(6, true), (3, true), (1, true)]);
        assert_eq!(forward, reverse);
        assert_eq!(forward, 0x4A);
    }

    #[test]
    fn test_false_flags_clear() {
        assert_eq!(pack_bits([(2, false), (5, false)]), 0x00);
    }
}
