use std::fmt;

use crate::asm::text::{TextKind, TextToken};
use crate::asm::TokenStream;
use crate::error::{Error, SymbolError, TokenError};
use crate::interp::address;
use crate::types::Width;
use crate::vm::regfile::{RegFile, RegRef};
use crate::vm::symbol::Symbol;
use crate::vm::Machine;


/// A resolved instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Register(RegRef),
    // Size is only known when a BYTE/WORD/DWORD marker was given
    Memory { address: u32, size: Option<Width> },
    Constant(u32),
    Variable(Symbol),
    Label(String),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Register(r) => write!(f, "{}", r),
            Argument::Memory { address, size: None } => write!(f, "[{}]", address),
            Argument::Memory { address, size: Some(w) } => write!(f, "{} [{}]", w, address),
            Argument::Constant(c) => write!(f, "{}", c),
            Argument::Variable(s) => write!(f, "{}", s.name),
            Argument::Label(l) => write!(f, "{}", l),
        }
    }
}


/// Read the operands up to the end of the statement.
///
/// Operands may be separated by commas or just whitespace. The terminating
/// newline is consumed.
pub fn parse_arguments(tokens: &mut TokenStream<TextKind>, machine: &Machine) -> Result<Vec<Argument>, Error> {
    let mut arguments = vec![];
    // A separator is only valid right after an operand
    let mut separated = true;

    loop {
        let t = tokens.next_token();

        match t.kind {
            TextKind::Newline | TextKind::Eof => {
                if separated && !arguments.is_empty() {
                    return Err(unexpected("operand", &t));
                }
                return Ok(arguments);
            },
            TextKind::Separator => {
                if separated {
                    return Err(unexpected("operand", &t));
                }
                separated = true;
                continue;
            },
            _ => (),
        }

        arguments.push(parse_argument(t, tokens, machine)?);
        separated = false;
    }
}

fn parse_argument(t: TextToken, tokens: &mut TokenStream<TextKind>, machine: &Machine) -> Result<Argument, Error> {
    match t.kind {
        TextKind::Register => Ok(Argument::Register(RegFile::resolve(&t.lexeme)?)),
        TextKind::Number => Ok(Argument::Constant(address::parse_constant(&t.lexeme)?)),
        TextKind::Label => Ok(Argument::Label(t.lexeme)),
        TextKind::OpenBracket => {
            let address = address::resolve(tokens, &machine.reg)?;
            Ok(Argument::Memory { address, size: None })
        },
        TextKind::Size(width) => {
            // Optional PTR
            if tokens.peek().kind == TextKind::Word && tokens.peek().lexeme == "PTR" {
                tokens.next_token();
            }

            let open = tokens.next_token();
            if open.kind != TextKind::OpenBracket {
                return Err(unexpected("'[' after size marker", &open));
            }
            let address = address::resolve(tokens, &machine.reg)?;
            Ok(Argument::Memory { address, size: Some(width) })
        },
        TextKind::Word => {
            match machine.mem.symbol(&t.lexeme) {
                Some(symbol) => Ok(Argument::Variable(symbol.clone())),
                None         => Err(SymbolError::UnknownVariable(t.lexeme).into()),
            }
        },
        _ => Err(unexpected("operand", &t)),
    }
}

fn unexpected(expected: &'static str, t: &TextToken) -> Error {
    TokenError::Unexpected {
        expected,
        found: t.lexeme.clone(),
        line: t.line,
        column: t.column,
    }.into()
}
