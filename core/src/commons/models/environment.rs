use ethereum_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

/// Data of the invocation supplied by the node embedding the JIT.
///
/// The byte buffers returned by [ExternalContext::call_data] and [ExternalContext::code]
/// are referenced by the execution context record without being copied, so they must
/// stay put for as long as the context is borrowed.
pub trait ExternalContext {
    fn my_address(&self) -> H160;
    fn caller(&self) -> H160;
    fn origin(&self) -> H160;
    fn value(&self) -> U256;
    fn gas_price(&self) -> U256;
    fn call_data(&self) -> &[u8];
    fn code(&self) -> &[u8];
    fn previous_block(&self) -> &BlockInfo;
    fn current_block(&self) -> &BlockInfo;
}

/// Block metadata visible to a running program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub hash: H256,
    #[serde(rename = "coinbase")]
    pub coinbase_address: H160,
    pub timestamp: U256,
    pub number: U256,
    pub difficulty: U256,
    #[serde(rename = "gaslimit")]
    pub gas_limit: U256,
}

/// Owned [ExternalContext], usable as a fixture or loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEnvironment {
    #[serde(rename = "address")]
    pub my_address: H160,
    pub caller: H160,
    pub origin: H160,
    pub value: U256,
    #[serde(rename = "gasprice")]
    pub gas_price: U256,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub code: Vec<u8>,
    #[serde(rename = "previousblock")]
    pub previous_block: BlockInfo,
    #[serde(rename = "currentblock")]
    pub current_block: BlockInfo,
}

impl CallEnvironment {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ExternalContext for CallEnvironment {
    fn my_address(&self) -> H160 {
        self.my_address
    }

    fn caller(&self) -> H160 {
        self.caller
    }

    fn origin(&self) -> H160 {
        self.origin
    }

    fn value(&self) -> U256 {
        self.value
    }

    fn gas_price(&self) -> U256 {
        self.gas_price
    }

    fn call_data(&self) -> &[u8] {
        &self.data
    }

    fn code(&self) -> &[u8] {
        &self.code
    }

    fn previous_block(&self) -> &BlockInfo {
        &self.previous_block
    }

    fn current_block(&self) -> &BlockInfo {
        &self.current_block
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.strip_prefix("0x").unwrap_or(&raw);
        hex::decode(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::{CallEnvironment, ExternalContext};
    use ethereum_types::{H160, U256};

    #[test]
    fn environment_from_json() {
        let json = r#"{
            "address": "0x0000000000000000000000000000000000000001",
            "caller": "0x0000000000000000000000000000000000000002",
            "origin": "0x0000000000000000000000000000000000000003",
            "value": "0x5",
            "gasprice": "0xa",
            "data": "0x0102",
            "code": "0x6000",
            "previousblock": {
                "hash": "0x0000000000000000000000000000000000000000000000000000000000000001",
                "coinbase": "0x0000000000000000000000000000000000000000",
                "timestamp": "0x0",
                "number": "0x0",
                "difficulty": "0x0",
                "gaslimit": "0x0"
            },
            "currentblock": {
                "hash": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "coinbase": "0x00000000000000000000000000000000000000ff",
                "timestamp": "0x64",
                "number": "0x7",
                "difficulty": "0x1",
                "gaslimit": "0x7a1200"
            }
        }"#;
        let environment = CallEnvironment::from_json(json).unwrap();
        assert_eq!(environment.my_address(), H160::from_low_u64_be(1));
        assert_eq!(environment.value(), U256::from(5u64));
        assert_eq!(environment.call_data(), &[0x01, 0x02]);
        assert_eq!(environment.code(), &[0x60, 0x00]);
        assert_eq!(environment.current_block().number, U256::from(7u64));
        assert_eq!(
            environment.current_block().coinbase_address,
            H160::from_low_u64_be(0xff)
        );
        let serialized = serde_json::to_string(&environment).unwrap();
        assert_eq!(
            CallEnvironment::from_json(&serialized).unwrap(),
            environment
        );
    }
}
