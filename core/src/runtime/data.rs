use std::mem::{offset_of, size_of};

use crate::commons::word::GeneratedWord;

use super::continuation::Continuation;

/// Named word slots of the execution context record.
///
/// The discriminant is the position of the slot inside [RuntimeData::elems]. New slots are
/// only ever appended: generated code addresses slots by this number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum RuntimeIndex {
    Gas,
    Address,
    Caller,
    Origin,
    CallValue,
    CallDataSize,
    GasPrice,
    PrevHash,
    CoinBase,
    TimeStamp,
    Number,
    Difficulty,
    GasLimit,
    CodeSize,
    ReturnDataOffset,
    ReturnDataSize,
}

impl RuntimeIndex {
    pub const COUNT: usize = 16;

    pub const ALL: [RuntimeIndex; Self::COUNT] = [
        RuntimeIndex::Gas,
        RuntimeIndex::Address,
        RuntimeIndex::Caller,
        RuntimeIndex::Origin,
        RuntimeIndex::CallValue,
        RuntimeIndex::CallDataSize,
        RuntimeIndex::GasPrice,
        RuntimeIndex::PrevHash,
        RuntimeIndex::CoinBase,
        RuntimeIndex::TimeStamp,
        RuntimeIndex::Number,
        RuntimeIndex::Difficulty,
        RuntimeIndex::GasLimit,
        RuntimeIndex::CodeSize,
        RuntimeIndex::ReturnDataOffset,
        RuntimeIndex::ReturnDataSize,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    /// Label attached to the slot in logs of generated code.
    pub fn name(self) -> &'static str {
        match self {
            RuntimeIndex::Gas => "gas",
            RuntimeIndex::Address => "address",
            RuntimeIndex::Caller => "caller",
            RuntimeIndex::Origin => "origin",
            RuntimeIndex::CallValue => "callvalue",
            RuntimeIndex::CallDataSize => "calldatasize",
            RuntimeIndex::GasPrice => "gasprice",
            RuntimeIndex::PrevHash => "prevhash",
            RuntimeIndex::CoinBase => "coinbase",
            RuntimeIndex::TimeStamp => "timestamp",
            RuntimeIndex::Number => "number",
            RuntimeIndex::Difficulty => "difficulty",
            RuntimeIndex::GasLimit => "gaslimit",
            RuntimeIndex::CodeSize => "codesize",
            RuntimeIndex::ReturnDataOffset => "returndataoffset",
            RuntimeIndex::ReturnDataSize => "returndatasize",
        }
    }
}

// A slot appended without bumping COUNT and ALL would fall outside the record.
const _: () = {
    let last = RuntimeIndex::COUNT - 1;
    assert!(RuntimeIndex::ReturnDataSize as usize == last);
    assert!(RuntimeIndex::ALL[last] as usize == last);
};

/// Positional fields of [RuntimeData].
///
/// Word slots are reached dynamically through a [RuntimeIndex]; the pointer fields are a
/// fixed set addressed by their position in the record and never by a slot number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    Elems = 0,
    CallData = 1,
    Code = 2,
    Continuation = 3,
}

impl RecordField {
    pub fn name(self) -> &'static str {
        match self {
            RecordField::Elems => "elems",
            RecordField::CallData => "calldata",
            RecordField::Code => "code",
            RecordField::Continuation => "continuation",
        }
    }
}

/// Execution context record shared between the host and generated code.
///
/// The field order is part of the ABI: generated code reads and writes this struct at
/// offsets computed by [RuntimeData::word_offset] and [RuntimeData::field_offset].
#[derive(Debug)]
#[repr(C)]
pub struct RuntimeData {
    pub elems: [GeneratedWord; RuntimeIndex::COUNT],
    pub call_data: *const u8,
    pub code: *const u8,
    pub continuation: *const Continuation,
}

impl RuntimeData {
    pub fn new() -> Self {
        Self {
            elems: [GeneratedWord::ZERO; RuntimeIndex::COUNT],
            call_data: std::ptr::null(),
            code: std::ptr::null(),
            continuation: std::ptr::null(),
        }
    }

    /// Byte offset of a word slot from the start of the record.
    pub fn word_offset(index: RuntimeIndex) -> i32 {
        (offset_of!(RuntimeData, elems) + index.position() * size_of::<GeneratedWord>()) as i32
    }

    /// Byte offset of a positional field from the start of the record.
    pub fn field_offset(field: RecordField) -> i32 {
        let offset = match field {
            RecordField::Elems => offset_of!(RuntimeData, elems),
            RecordField::CallData => offset_of!(RuntimeData, call_data),
            RecordField::Code => offset_of!(RuntimeData, code),
            RecordField::Continuation => offset_of!(RuntimeData, continuation),
        };
        offset as i32
    }
}

impl Default for RuntimeData {
    fn default() -> Self {
        Self::new()
    }
}
