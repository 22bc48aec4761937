use thiserror::Error;

use crate::runtime::RuntimeIndex;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Byte {0:#04x} is not a known instruction")]
pub struct UnknownInstruction(pub u8);

/// Opcodes of the virtual machine known to the runtime interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,

    SHA3 = 0x20,

    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3a,

    PREVHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    DIFFICULTY = 0x44,
    GASLIMIT = 0x45,

    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5a,
    JUMPDEST = 0x5b,

    PUSH1 = 0x60,

    RETURN = 0xf3,
    SUICIDE = 0xff,
}

impl Instruction {
    /// Word slot copied by a context-read instruction; `None` for every other opcode.
    pub fn context_index(self) -> Option<RuntimeIndex> {
        let index = match self {
            Instruction::GAS => RuntimeIndex::Gas,
            Instruction::ADDRESS => RuntimeIndex::Address,
            Instruction::CALLER => RuntimeIndex::Caller,
            Instruction::ORIGIN => RuntimeIndex::Origin,
            Instruction::CALLVALUE => RuntimeIndex::CallValue,
            Instruction::CALLDATASIZE => RuntimeIndex::CallDataSize,
            Instruction::GASPRICE => RuntimeIndex::GasPrice,
            Instruction::PREVHASH => RuntimeIndex::PrevHash,
            Instruction::COINBASE => RuntimeIndex::CoinBase,
            Instruction::TIMESTAMP => RuntimeIndex::TimeStamp,
            Instruction::NUMBER => RuntimeIndex::Number,
            Instruction::DIFFICULTY => RuntimeIndex::Difficulty,
            Instruction::GASLIMIT => RuntimeIndex::GasLimit,
            Instruction::CODESIZE => RuntimeIndex::CodeSize,
            _ => return None,
        };
        Some(index)
    }

    pub fn is_context_read(self) -> bool {
        self.context_index().is_some()
    }
}

impl TryFrom<u8> for Instruction {
    type Error = UnknownInstruction;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        use Instruction::*;
        let instruction = match byte {
            0x00 => STOP,
            0x01 => ADD,
            0x02 => MUL,
            0x03 => SUB,
            0x04 => DIV,
            0x20 => SHA3,
            0x30 => ADDRESS,
            0x31 => BALANCE,
            0x32 => ORIGIN,
            0x33 => CALLER,
            0x34 => CALLVALUE,
            0x35 => CALLDATALOAD,
            0x36 => CALLDATASIZE,
            0x37 => CALLDATACOPY,
            0x38 => CODESIZE,
            0x39 => CODECOPY,
            0x3a => GASPRICE,
            0x40 => PREVHASH,
            0x41 => COINBASE,
            0x42 => TIMESTAMP,
            0x43 => NUMBER,
            0x44 => DIFFICULTY,
            0x45 => GASLIMIT,
            0x50 => POP,
            0x51 => MLOAD,
            0x52 => MSTORE,
            0x53 => MSTORE8,
            0x54 => SLOAD,
            0x55 => SSTORE,
            0x56 => JUMP,
            0x57 => JUMPI,
            0x58 => PC,
            0x59 => MSIZE,
            0x5a => GAS,
            0x5b => JUMPDEST,
            0x60 => PUSH1,
            0xf3 => RETURN,
            0xff => SUICIDE,
            other => return Err(UnknownInstruction(other)),
        };
        Ok(instruction)
    }
}
