use std::marker::PhantomData;

use ethereum_types::U256;

use crate::commons::{
    models::environment::ExternalContext,
    word::{from_address, from_hash, to_generated, to_host, to_usize},
};

use super::{
    continuation::Continuation,
    data::{RuntimeData, RuntimeIndex},
    errors::RuntimeError,
    memory::LinearMemory,
};

/// Host side of one invocation of generated code.
///
/// Owns the execution context record and the linear memory. The record points into the
/// call data and code of the [ExternalContext] it was built from, so the runtime borrows
/// that context (and the [Continuation]) for its whole life.
#[derive(Debug)]
pub struct Runtime<'e> {
    data: Box<RuntimeData>,
    memory: LinearMemory,
    continuation: &'e Continuation,
    _ext: PhantomData<&'e [u8]>,
}

impl<'e> Runtime<'e> {
    pub fn new<E: ExternalContext + ?Sized>(
        gas: U256,
        ext: &'e E,
        continuation: &'e Continuation,
    ) -> Self {
        let mut runtime = Self {
            data: Box::new(RuntimeData::new()),
            memory: LinearMemory::new(),
            continuation,
            _ext: PhantomData,
        };
        let previous_block = ext.previous_block();
        let current_block = ext.current_block();
        runtime.set(RuntimeIndex::Gas, gas);
        runtime.set(RuntimeIndex::Address, from_address(ext.my_address()));
        runtime.set(RuntimeIndex::Caller, from_address(ext.caller()));
        runtime.set(RuntimeIndex::Origin, from_address(ext.origin()));
        runtime.set(RuntimeIndex::CallValue, ext.value());
        runtime.set(
            RuntimeIndex::CallDataSize,
            U256::from(ext.call_data().len() as u64),
        );
        runtime.set(RuntimeIndex::GasPrice, ext.gas_price());
        runtime.set(RuntimeIndex::PrevHash, from_hash(previous_block.hash));
        runtime.set(
            RuntimeIndex::CoinBase,
            from_address(current_block.coinbase_address),
        );
        runtime.set(RuntimeIndex::TimeStamp, current_block.timestamp);
        runtime.set(RuntimeIndex::Number, current_block.number);
        runtime.set(RuntimeIndex::Difficulty, current_block.difficulty);
        runtime.set(RuntimeIndex::GasLimit, current_block.gas_limit);
        runtime.set(RuntimeIndex::CodeSize, U256::from(ext.code().len() as u64));
        runtime.data.call_data = ext.call_data().as_ptr();
        runtime.data.code = ext.code().as_ptr();
        runtime.data.continuation = continuation as *const Continuation;
        runtime
    }

    pub fn set(&mut self, index: RuntimeIndex, value: U256) {
        self.data.elems[index.position()] = to_generated(value);
    }

    pub fn get(&self, index: RuntimeIndex) -> U256 {
        to_host(self.data.elems[index.position()])
    }

    pub fn get_gas(&self) -> U256 {
        self.get(RuntimeIndex::Gas)
    }

    /// Bytes registered by generated code as the output of the invocation.
    ///
    /// A range that does not fit in the linear memory yields an empty slice.
    pub fn get_return_data(&self) -> &[u8] {
        match self.try_return_data() {
            Ok(data) => data,
            Err(error) => {
                log::debug!("Return data discarded: {}", error);
                &[]
            }
        }
    }

    pub fn try_return_data(&self) -> Result<&[u8], RuntimeError> {
        let offset = self.get(RuntimeIndex::ReturnDataOffset);
        let size = self.get(RuntimeIndex::ReturnDataSize);
        let invalid = || RuntimeError::InvalidMemoryAccess {
            offset,
            size,
            len: self.memory.len(),
        };
        match (to_usize(offset), to_usize(size)) {
            (Some(offset), Some(size)) => self.memory.read(offset, size).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    pub fn continuation(&self) -> &Continuation {
        self.continuation
    }

    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    pub fn data(&self) -> &RuntimeData {
        &self.data
    }

    /// Address of the record handed to the entry routine. Stable for the life of the runtime.
    pub fn data_ptr(&mut self) -> *mut RuntimeData {
        &mut *self.data as *mut RuntimeData
    }
}

#[cfg(test)]
mod test {
    use super::Runtime;
    use crate::commons::models::environment::{BlockInfo, CallEnvironment};
    use crate::commons::word::from_address;
    use crate::runtime::{continuation::Continuation, data::RuntimeIndex, errors::RuntimeError};
    use ethereum_types::{H160, H256, U256};

    fn environment() -> CallEnvironment {
        CallEnvironment {
            my_address: H160::from_low_u64_be(0xaa),
            caller: H160::from_low_u64_be(0xbb),
            origin: H160::from_low_u64_be(0xcc),
            value: U256::from(5u64),
            gas_price: U256::from(20u64),
            data: vec![1; 10],
            code: vec![0x60, 0x00, 0x5a],
            previous_block: BlockInfo {
                hash: H256::from_low_u64_be(0x1234),
                ..Default::default()
            },
            current_block: BlockInfo {
                hash: H256::zero(),
                coinbase_address: H160::from_low_u64_be(0xdd),
                timestamp: U256::from(1_700_000_000u64),
                number: U256::from(42u64),
                difficulty: U256::from(131072u64),
                gas_limit: U256::from(8_000_000u64),
            },
        }
    }

    #[test]
    fn record_is_populated_from_context() {
        let environment = environment();
        let continuation = Continuation::new();
        let runtime = Runtime::new(U256::from(21000u64), &environment, &continuation);
        let expected = [
            (RuntimeIndex::Gas, U256::from(21000u64)),
            (RuntimeIndex::Address, U256::from(0xaau64)),
            (RuntimeIndex::Caller, U256::from(0xbbu64)),
            (RuntimeIndex::Origin, U256::from(0xccu64)),
            (RuntimeIndex::CallValue, U256::from(5u64)),
            (RuntimeIndex::CallDataSize, U256::from(10u64)),
            (RuntimeIndex::GasPrice, U256::from(20u64)),
            (RuntimeIndex::PrevHash, U256::from(0x1234u64)),
            (
                RuntimeIndex::CoinBase,
                from_address(H160::from_low_u64_be(0xdd)),
            ),
            (RuntimeIndex::TimeStamp, U256::from(1_700_000_000u64)),
            (RuntimeIndex::Number, U256::from(42u64)),
            (RuntimeIndex::Difficulty, U256::from(131072u64)),
            (RuntimeIndex::GasLimit, U256::from(8_000_000u64)),
            (RuntimeIndex::CodeSize, U256::from(3u64)),
            (RuntimeIndex::ReturnDataOffset, U256::zero()),
            (RuntimeIndex::ReturnDataSize, U256::zero()),
        ];
        for (index, value) in expected {
            assert_eq!(runtime.get(index), value, "slot {}", index.name());
        }
        assert_eq!(runtime.data().call_data, environment.data.as_ptr());
        assert_eq!(runtime.data().code, environment.code.as_ptr());
        assert_eq!(
            runtime.data().continuation,
            &continuation as *const Continuation
        );
        let code = unsafe { std::slice::from_raw_parts(runtime.data().code, 3) };
        assert_eq!(code, &[0x60, 0x00, 0x5a]);
    }

    #[test]
    fn set_only_touches_its_slot() {
        let environment = environment();
        let continuation = Continuation::new();
        let mut runtime = Runtime::new(U256::from(21000u64), &environment, &continuation);
        for index in RuntimeIndex::ALL {
            let before: Vec<U256> = RuntimeIndex::ALL.iter().map(|i| runtime.get(*i)).collect();
            runtime.set(index, U256::MAX - U256::from(index.position() as u64));
            for other in RuntimeIndex::ALL {
                if other == index {
                    assert_eq!(
                        runtime.get(other),
                        U256::MAX - U256::from(index.position() as u64)
                    );
                } else {
                    assert_eq!(runtime.get(other), before[other.position()]);
                }
            }
        }
    }

    #[test]
    fn return_data_bounds() {
        let environment = environment();
        let continuation = Continuation::new();
        let mut runtime = Runtime::new(U256::from(21000u64), &environment, &continuation);
        runtime.memory_mut().resize(64);
        runtime.memory_mut().write(4, &[7; 8]).unwrap();
        runtime.set(RuntimeIndex::ReturnDataOffset, U256::from(4u64));
        runtime.set(RuntimeIndex::ReturnDataSize, U256::from(8u64));
        assert_eq!(runtime.get_return_data(), &[7; 8]);

        runtime.set(RuntimeIndex::ReturnDataOffset, U256::from(56u64));
        assert_eq!(runtime.get_return_data().len(), 8);

        runtime.set(RuntimeIndex::ReturnDataOffset, U256::from(60u64));
        assert!(runtime.get_return_data().is_empty());
        assert!(matches!(
            runtime.try_return_data(),
            Err(RuntimeError::InvalidMemoryAccess { len: 64, .. })
        ));

        runtime.set(RuntimeIndex::ReturnDataOffset, U256::MAX);
        assert!(runtime.get_return_data().is_empty());
        runtime.set(RuntimeIndex::ReturnDataOffset, U256::zero());
        runtime.set(RuntimeIndex::ReturnDataSize, U256::MAX);
        assert!(runtime.get_return_data().is_empty());
    }

    #[test]
    fn gas_reads_the_gas_slot() {
        let environment = environment();
        let continuation = Continuation::new();
        let mut runtime = Runtime::new(U256::from(21000u64), &environment, &continuation);
        assert_eq!(runtime.get_gas(), U256::from(21000u64));
        runtime.set(RuntimeIndex::Gas, U256::from(3u64));
        assert_eq!(runtime.get_gas(), U256::from(3u64));
    }
}
