use ethereum_types::{H160, H256, U256};
use evmjit_core::{BlockInfo, CallEnvironment};

pub const INITIAL_GAS: u64 = 21000;

/// Environment with a distinct value in every field read by the record.
#[allow(dead_code)]
pub fn environment() -> CallEnvironment {
    CallEnvironment {
        my_address: H160::from_low_u64_be(0x1001),
        caller: H160::from_low_u64_be(0x1002),
        origin: H160::from_low_u64_be(0x1003),
        value: U256::from(5u64),
        gas_price: U256::from(30u64),
        data: (1..=10).collect(),
        code: vec![0x5a, 0x34, 0x00],
        previous_block: BlockInfo {
            hash: H256::from_low_u64_be(0xbeef),
            ..Default::default()
        },
        current_block: BlockInfo {
            hash: H256::zero(),
            coinbase_address: H160::from_low_u64_be(0x1004),
            timestamp: U256::from(1_600_000_000u64),
            number: U256::from(1_000_000u64),
            difficulty: U256::from(0x20000u64),
            gas_limit: U256([1, 2, 3, 4]),
        },
    }
}

/// Reads a word stored by generated code as four native-endian limbs.
#[allow(dead_code)]
pub fn read_memory_word(memory: &[u8], offset: usize) -> U256 {
    let mut limbs = [0u64; 4];
    for (index, limb) in limbs.iter_mut().enumerate() {
        let start = offset + index * 8;
        let bytes: [u8; 8] = memory[start..start + 8].try_into().unwrap();
        *limb = u64::from_ne_bytes(bytes);
    }
    U256(limbs)
}
