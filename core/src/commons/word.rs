//! Conversions between the host's 256-bit integers and the word layout used by generated code.
use ethereum_types::{H160, H256, U256};

/// Number of 64-bit limbs in a word.
pub const WORD_LIMBS: usize = 4;
/// Size in bytes of a word as stored in the execution context record.
pub const WORD_SIZE: usize = 32;

/// 256-bit word as laid out in memory shared with generated code.
///
/// Four native-endian `u64` limbs, least significant limb first. Generated code reads
/// limb `k` at byte offset `8 * k` of the word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C, align(8))]
pub struct GeneratedWord {
    limbs: [u64; WORD_LIMBS],
}

impl GeneratedWord {
    pub const ZERO: Self = Self {
        limbs: [0; WORD_LIMBS],
    };

    pub fn from_limbs(limbs: [u64; WORD_LIMBS]) -> Self {
        Self { limbs }
    }

    pub fn limbs(&self) -> &[u64; WORD_LIMBS] {
        &self.limbs
    }
}

pub fn to_generated(word: U256) -> GeneratedWord {
    let U256(limbs) = word;
    GeneratedWord { limbs }
}

pub fn to_host(word: GeneratedWord) -> U256 {
    U256(word.limbs)
}

/// Interprets an account address as a big-endian integer.
pub fn from_address(address: H160) -> U256 {
    U256::from_big_endian(address.as_bytes())
}

/// Interprets a 32-byte hash as a big-endian integer.
pub fn from_hash(hash: H256) -> U256 {
    U256::from_big_endian(hash.as_bytes())
}

/// Narrows a word to a buffer index. `None` when it does not fit in `usize`.
pub fn to_usize(word: U256) -> Option<usize> {
    if word.bits() > 64 {
        return None;
    }
    usize::try_from(word.low_u64()).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip_preserves_value() {
        let values = [
            U256::zero(),
            U256::one(),
            U256::from(21000u64),
            U256::from(u64::MAX) + U256::one(),
            U256::MAX,
            U256([0x1122, 0x3344, 0x5566, 0x7788]),
        ];
        for value in values {
            assert_eq!(to_host(to_generated(value)), value);
        }
    }

    #[test]
    fn least_significant_limb_first() {
        let word = to_generated(U256([7, 0, 0, 1]));
        assert_eq!(word.limbs(), &[7, 0, 0, 1]);
        assert_eq!(std::mem::size_of::<GeneratedWord>(), WORD_SIZE);
        assert_eq!(std::mem::align_of::<GeneratedWord>(), 8);
    }

    #[test]
    fn address_is_big_endian() {
        let mut raw = [0u8; 20];
        raw[19] = 0x2a;
        raw[18] = 0x01;
        assert_eq!(from_address(H160::from(raw)), U256::from(0x012au64));
        assert_eq!(from_hash(H256::zero()), U256::zero());
    }

    #[test]
    fn narrowing_rejects_wide_values() {
        assert_eq!(to_usize(U256::from(64u64)), Some(64));
        assert_eq!(to_usize(U256([0, 1, 0, 0])), None);
        assert_eq!(to_usize(U256::MAX), None);
    }
}
