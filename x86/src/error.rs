use thiserror::Error;

use crate::types::Width;


#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("unterminated literal starting at ({line},{column})")]
    UnterminatedLiteral { line: usize, column: usize },

    #[error("unexpected character {character:?} at ({line},{column})")]
    UnexpectedCharacter { character: char, line: usize, column: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("expected {expected}, found {found:?} at ({line},{column})")]
    Unexpected { expected: &'static str, found: String, line: usize, column: usize },

    #[error("{lexeme:?} is not a valid {width} value at ({line},{column})")]
    InvalidValue { lexeme: String, width: Width, line: usize, column: usize },

    #[error("line {line} is outside of any section, expected data: or text: first")]
    MissingSection { line: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    #[error("variable {0:?} already declared")]
    DuplicateVariable(String),

    #[error("label {0:?} already declared")]
    DuplicateLabel(String),

    #[error("variable {0:?} not found")]
    UnknownVariable(String),

    #[error("register {0:?} not found")]
    UnknownRegister(String),

    #[error("label {0:?} must be declared before jumping to it")]
    UnknownLabel(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    #[error("{width} access at {address} is outside of memory (capacity {capacity})")]
    OutOfBounds { address: u32, width: Width, capacity: u32 },

    #[error("malformed address expression at ({line},{column}): {reason}")]
    Malformed { reason: String, line: usize, column: usize },

    #[error("at most 2 registers can be used in an address")]
    TooManyRegisters,

    #[error("at most 1 constant can be used in an address")]
    TooManyConstants,

    #[error("at most 1 register can be scaled in an address")]
    TooManyScaled,

    #[error("cannot subtract two registers in an address")]
    RegisterSubtraction,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperandError {
    #[error("{mnemonic} takes {expected} operand(s), {found} given")]
    Count { mnemonic: &'static str, expected: usize, found: usize },

    #[error("{mnemonic} does not accept operands {operands}")]
    Shape { mnemonic: &'static str, operands: String },

    #[error("{mnemonic} operands differ in size: {left} and {right}")]
    WidthMismatch { mnemonic: &'static str, left: Width, right: Width },

    #[error("{mnemonic} needs a double word register, not {register:?}")]
    NotDword { mnemonic: &'static str, register: String },

    #[error("{lexeme:?} is not a valid constant")]
    InvalidConstant { lexeme: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstructionError {
    #[error("unknown instruction {name:?} at ({line},{column})")]
    Unknown { name: String, line: usize, column: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Operand(#[from] OperandError),

    #[error(transparent)]
    Instruction(#[from] InstructionError),

    #[error("step limit of {limit} statements exceeded")]
    StepLimit { limit: u64 },
}
