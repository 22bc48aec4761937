use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status reported by a generated program when it leaves its entry routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ReturnCode {
    Stop = 0,
    Return = 1,
    Suicide = 2,

    BadJumpDestination = 101,
    OutOfGas = 102,
    StackTooSmall = 103,
    BadInstruction = 104,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown return code {0}")]
pub struct UnknownReturnCode(pub i32);

impl ReturnCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Codes in this range end the invocation through the abort path.
    pub fn is_failure(self) -> bool {
        self.code() > 100
    }
}

impl TryFrom<i32> for ReturnCode {
    type Error = UnknownReturnCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Stop),
            1 => Ok(Self::Return),
            2 => Ok(Self::Suicide),
            101 => Ok(Self::BadJumpDestination),
            102 => Ok(Self::OutOfGas),
            103 => Ok(Self::StackTooSmall),
            104 => Ok(Self::BadInstruction),
            other => Err(UnknownReturnCode(other)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ReturnCode;

    #[test]
    fn codes_convert_back() {
        for code in [
            ReturnCode::Stop,
            ReturnCode::Return,
            ReturnCode::Suicide,
            ReturnCode::BadJumpDestination,
            ReturnCode::OutOfGas,
            ReturnCode::StackTooSmall,
            ReturnCode::BadInstruction,
        ] {
            assert_eq!(ReturnCode::try_from(code.code()), Ok(code));
        }
        assert!(ReturnCode::try_from(3).is_err());
        assert!(ReturnCode::OutOfGas.is_failure());
        assert!(!ReturnCode::Return.is_failure());
    }
}
