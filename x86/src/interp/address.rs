use crate::asm::text::{TextKind, TextToken};
use crate::asm::TokenStream;
use crate::error::{AddressError, Error, OperandError};
use crate::vm::regfile::RegFile;


// Address expression: term (('+'|'-') term)* ']'
// term: register | constant | constant '*' register
const MAX_REGISTERS: u8 = 2;
const MAX_CONSTANTS: u8 = 1;
const MAX_SCALED: u8 = 1;

#[derive(Debug, Default)]
struct Budget {
    registers: u8,
    constants: u8,
    scaled: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    Register,
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
}


/// Evaluate an address expression, the opening `[` already consumed.
///
/// Terms combine left to right with wrapping arithmetic. The result is not
/// bounds checked, that happens when memory is accessed.
pub fn resolve(tokens: &mut TokenStream<TextKind>, regs: &RegFile) -> Result<u32, Error> {
    let mut budget = Budget::default();
    let address = resolve_terms(tokens, regs, &mut budget, 0, Op::Add, None)?;

    tracing::trace!("address resolved to {address}");
    Ok(address)
}

fn resolve_terms(
    tokens: &mut TokenStream<TextKind>,
    regs: &RegFile,
    budget: &mut Budget,
    acc: u32,
    op: Op,
    prev: Option<Term>,
) -> Result<u32, Error> {
    let (value, term) = read_term(tokens, regs, budget)?;

    if op == Op::Sub && prev == Some(Term::Register) && term == Term::Register {
        return Err(AddressError::RegisterSubtraction.into());
    }

    let acc = match op {
        Op::Add => acc.wrapping_add(value),
        Op::Sub => acc.wrapping_sub(value),
    };

    let t = tokens.next_token();
    match t.kind {
        TextKind::CloseBracket => Ok(acc),
        TextKind::Plus  => resolve_terms(tokens, regs, budget, acc, Op::Add, Some(term)),
        TextKind::Minus => resolve_terms(tokens, regs, budget, acc, Op::Sub, Some(term)),
        _ => Err(malformed("expected '+', '-' or ']'", &t)),
    }
}

fn read_term(
    tokens: &mut TokenStream<TextKind>,
    regs: &RegFile,
    budget: &mut Budget,
) -> Result<(u32, Term), Error> {
    let t = tokens.next_token();

    match t.kind {
        TextKind::Register => {
            budget.registers += 1;
            if budget.registers > MAX_REGISTERS {
                return Err(AddressError::TooManyRegisters.into());
            }
            Ok((regs.read_named(&t.lexeme)?, Term::Register))
        },
        TextKind::Number => {
            let constant = parse_constant(&t.lexeme)?;

            if tokens.peek().kind != TextKind::Times {
                budget.constants += 1;
                if budget.constants > MAX_CONSTANTS {
                    return Err(AddressError::TooManyConstants.into());
                }
                return Ok((constant, Term::Constant));
            }

            // constant * register
            tokens.next_token();
            let r = tokens.next_token();
            if r.kind != TextKind::Register {
                return Err(malformed("expected a register after '*'", &r));
            }

            budget.scaled += 1;
            if budget.scaled > MAX_SCALED {
                return Err(AddressError::TooManyScaled.into());
            }
            budget.registers += 1;
            if budget.registers > MAX_REGISTERS {
                return Err(AddressError::TooManyRegisters.into());
            }
            Ok((constant.wrapping_mul(regs.read_named(&r.lexeme)?), Term::Register))
        },
        TextKind::Newline | TextKind::Eof => Err(malformed("unterminated address", &t)),
        _ => Err(malformed("expected a register or a constant", &t)),
    }
}

pub(crate) fn parse_constant(lexeme: &str) -> Result<u32, OperandError> {
    lexeme.parse::<u32>().map_err(|_| OperandError::InvalidConstant { lexeme: lexeme.to_string() })
}

fn malformed(reason: &str, t: &TextToken) -> Error {
    AddressError::Malformed { reason: reason.to_string(), line: t.line, column: t.column }.into()
}


#[cfg(test)]
mod test_address {
    use super::*;
    use crate::asm::text;
    use crate::vm::regfile::Reg;

    fn regs() -> RegFile {
        let mut regs = RegFile::new(0);
        regs[Reg::Eax] = 100;
        regs[Reg::Ebx] = 5;
        regs[Reg::Ecx] = 0x1_02;
        regs
    }

    // Expression is given with its closing bracket
    fn eval(expr: &str) -> Result<u32, Error> {
        let mut tokens = text::scan(expr).unwrap();
        resolve(&mut tokens, &regs())
    }

    #[test]
    fn test_single_terms() {
        assert_eq!(eval("eax]"), Ok(100));
        assert_eq!(eval("42]"), Ok(42));
        assert_eq!(eval("4*ebx]"), Ok(20));
    }

    #[test]
    fn test_sub_register_views() {
        assert_eq!(eval("cl]"), Ok(0x02));
        assert_eq!(eval("ch + bx]"), Ok(0x01 + 5));
    }

    #[test]
    fn test_full_expression() {
        assert_eq!(eval("eax + 2*ebx + 7]"), Ok(117));
        assert_eq!(eval("eax + 2*ebx - 7]"), Ok(103));
        assert_eq!(eval("eax - 10 + ebx]"), Ok(95));
    }

    #[test]
    fn test_constant_minus_register() {
        assert_eq!(eval("200 - eax]"), Ok(100));
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(eval("ebx - 6]"), Ok(u32::MAX));
    }

    #[test]
    fn test_cursor_after_bracket() {
        let mut tokens = text::scan("eax], 1").unwrap();
        resolve(&mut tokens, &regs()).unwrap();
        assert_eq!(tokens.next_token().kind, TextKind::Separator);
    }

    #[test]
    fn test_too_many_registers() {
        assert_eq!(eval("eax + ebx + ecx]"), Err(AddressError::TooManyRegisters.into()));
        assert_eq!(eval("eax + ebx + 2*ecx]"), Err(AddressError::TooManyRegisters.into()));
    }

    #[test]
    fn test_too_many_constants() {
        assert_eq!(eval("eax + 1 + 2]"), Err(AddressError::TooManyConstants.into()));
    }

    #[test]
    fn test_too_many_scaled() {
        assert_eq!(eval("2*eax + 4*ebx]"), Err(AddressError::TooManyScaled.into()));
    }

    #[test]
    fn test_register_subtraction() {
        assert_eq!(eval("eax - ebx]"), Err(AddressError::RegisterSubtraction.into()));
        assert_eq!(eval("eax - 2*ebx]"), Err(AddressError::RegisterSubtraction.into()));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(eval("]"), Err(Error::Address(AddressError::Malformed { .. }))));
        assert!(matches!(eval("eax +]"), Err(Error::Address(AddressError::Malformed { .. }))));
        assert!(matches!(eval("eax"), Err(Error::Address(AddressError::Malformed { .. }))));
        assert!(matches!(eval("eax ebx]"), Err(Error::Address(AddressError::Malformed { .. }))));
        assert!(matches!(eval("2 * 3]"), Err(Error::Address(AddressError::Malformed { .. }))));
        assert!(matches!(eval("eax * 2]"), Err(Error::Address(AddressError::Malformed { .. }))));
    }

    #[test]
    fn test_malformed_position() {
        assert_eq!(
            eval("eax +\n"),
            Err(AddressError::Malformed { reason: "unterminated address".to_string(), line: 1, column: 6 }.into()),
        );
    }

    #[test]
    fn test_constant_overflow() {
        assert_eq!(
            eval("99999999999]"),
            Err(OperandError::InvalidConstant { lexeme: "99999999999".to_string() }.into()),
        );
    }
}
