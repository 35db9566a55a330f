use crate::asm::data::{self, DataKind, DataToken};
use crate::asm::lexer;
use crate::asm::TokenStream;
use crate::error::{Error, TokenError};
use crate::types::Width;
use crate::vm::mem::{Mem, Memory};


/// Lays out data directives at the top of global memory.
pub struct DataInterpreter<'m> {
    mem: &'m mut Memory,
}

impl<'m> DataInterpreter<'m> {
    pub fn new(mem: &'m mut Memory) -> DataInterpreter<'m> {
        DataInterpreter { mem }
    }

    pub fn interpret_section(&mut self, source: &str) -> Result<(), Error> {
        let mut tokens = data::scan(source)?;

        loop {
            match tokens.peek().kind {
                DataKind::Eof     => return Ok(()),
                DataKind::Newline => { tokens.next_token(); },
                _                 => self.statement(&mut tokens)?,
            }
        }
    }

    pub fn interpret_line(&mut self, line: &str) -> Result<(), Error> {
        self.interpret_section(lexer::strip_line_comment(line))
    }

    // [name] (DB|DW|DD) value (, value)*
    fn statement(&mut self, tokens: &mut TokenStream<DataKind>) -> Result<(), Error> {
        let first = tokens.next_token();

        let (name, width) = match first.kind {
            DataKind::Directive(width) => (None, width),
            DataKind::Word => {
                let directive = tokens.next_token();
                match directive.kind {
                    DataKind::Directive(width) => (Some(first.lexeme), width),
                    _ => return Err(unexpected("DB, DW or DD", &directive)),
                }
            },
            _ => return Err(unexpected("variable name or directive", &first)),
        };

        // Declared before any unit of the statement is written
        if let Some(name) = name {
            let symbol = self.mem.declare(&name, width)?;
            tracing::debug!("variable {} declared at {} ({})", symbol.name, symbol.address, symbol.width);
        }

        // count DUP (value) is only recognized as the first value group
        if tokens.peek().kind == DataKind::Number && tokens.peek_nth(1).kind == DataKind::Dup {
            self.dup(tokens, width)?;
            if !self.separator(tokens)? {
                return Ok(());
            }
        }

        loop {
            let t = tokens.next_token();
            self.value(&t, width)?;

            if !self.separator(tokens)? {
                return Ok(());
            }
        }
    }

    // true on ',' and false at the end of the statement
    fn separator(&mut self, tokens: &mut TokenStream<DataKind>) -> Result<bool, Error> {
        let t = tokens.next_token();
        match t.kind {
            DataKind::Separator => Ok(true),
            DataKind::Newline | DataKind::Eof => Ok(false),
            _ => Err(unexpected("',' or end of line", &t)),
        }
    }

    fn dup(&mut self, tokens: &mut TokenStream<DataKind>, width: Width) -> Result<(), Error> {
        let count = tokens.next_token();
        let count_value = count.lexeme.parse::<u32>().map_err(|_| invalid(&count, Width::Dword))?;
        tokens.next_token();

        let open = tokens.peek().kind == DataKind::OpenParen;
        if open {
            tokens.next_token();
        }

        let value = tokens.next_token();
        if value.kind == DataKind::Str {
            return Err(invalid(&value, width));
        }

        let close = tokens.peek().kind == DataKind::CloseParen;
        if close {
            tokens.next_token();
        }

        if open && close {
            let unit = self.unit(&value, width)?;
            for _ in 0..count_value {
                self.emit(width, unit)?;
            }
        } else {
            // Broken brackets, the inner value is laid out once
            self.value(&value, width)?;
        }
        Ok(())
    }

    fn value(&mut self, t: &DataToken, width: Width) -> Result<(), Error> {
        match t.kind {
            DataKind::Str => {
                for c in lexer::unquote(&t.lexeme).chars() {
                    self.emit(width, c as u32)?;
                }
                Ok(())
            },
            _ => {
                let unit = self.unit(t, width)?;
                self.emit(width, unit)
            },
        }
    }

    // A single unit: a number or ?
    fn unit(&self, t: &DataToken, width: Width) -> Result<u32, Error> {
        match t.kind {
            DataKind::EmptyValue => Ok(0),
            DataKind::Number => t.lexeme.parse::<u32>().map_err(|_| invalid(t, width)),
            _ => Err(invalid(t, width)),
        }
    }

    fn emit(&mut self, width: Width, value: u32) -> Result<(), Error> {
        let address = self.mem.top();
        let value = width.truncate(value);

        self.mem.store(width, address, value)?;
        self.mem.advance_top(width);

        tracing::trace!("{} {} written at {}", width, value, address);
        Ok(())
    }
}

fn unexpected(expected: &'static str, t: &DataToken) -> Error {
    TokenError::Unexpected { expected, found: t.lexeme.clone(), line: t.line, column: t.column }.into()
}

fn invalid(t: &DataToken, width: Width) -> Error {
    TokenError::InvalidValue { lexeme: t.lexeme.clone(), width, line: t.line, column: t.column }.into()
}


#[cfg(test)]
mod test_data {
    use super::*;
    use crate::error::{AddressError, SymbolError};

    fn layout(source: &str) -> Result<Memory, Error> {
        let mut mem = Memory::new(64);
        DataInterpreter::new(&mut mem).interpret_section(source)?;
        Ok(mem)
    }

    #[test]
    fn test_byte() {
        let mem = layout("var DB 64").unwrap();

        assert_eq!(mem.load_byte(0).unwrap(), 64);
        assert_eq!(mem.symbol("var").unwrap().address, 0);
        assert_eq!(mem.symbol("var").unwrap().width, Width::Byte);
        assert_eq!(mem.top(), 1);
    }

    #[test]
    fn test_string() {
        let mem = layout("x DB 1\nstr DB 'hi'").unwrap();

        let at = mem.symbol("str").unwrap().address;
        assert_eq!(at, 1);
        assert_eq!(mem.load_byte(at).unwrap(), 'h' as u32);
        assert_eq!(mem.load_byte(at + 1).unwrap(), 'i' as u32);
    }

    #[test]
    fn test_string_units() {
        let mem = layout("w DW \"ab\"").unwrap();
        assert_eq!(mem.load_word(0).unwrap(), 'a' as u32);
        assert_eq!(mem.load_word(2).unwrap(), 'b' as u32);
        assert_eq!(mem.top(), 4);
    }

    #[test]
    fn test_dup() {
        let mem = layout("arr DB 3 DUP (7)\nend DB 1").unwrap();

        assert_eq!(&mem.as_slice()[..4], &[7, 7, 7, 1]);
        assert_eq!(mem.symbol("end").unwrap().address, 3);
    }

    #[test]
    fn test_dup_empty_value() {
        let mem = layout("arr DW 2 DUP (?), 5").unwrap();
        assert_eq!(&mem.as_slice()[..6], &[0, 0, 0, 0, 0, 5]);
    }

    #[test]
    fn test_dup_zero() {
        let mem = layout("arr DD 0 DUP (9)\nnext DB 1").unwrap();
        assert_eq!(mem.symbol("next").unwrap().address, 0);
    }

    #[test]
    fn test_dup_broken_brackets() {
        // Falls back to a single plain value
        let mem = layout("a DB 3 DUP (7\nb DB 4 DUP 8)\nc DB 2 DUP 6").unwrap();

        assert_eq!(&mem.as_slice()[..4], &[7, 8, 6, 0]);
        assert_eq!(mem.top(), 3);
    }

    #[test]
    fn test_dup_string_rejected() {
        assert!(matches!(layout("a DB 3 DUP ('x')"), Err(Error::Token(TokenError::InvalidValue { .. }))));
    }

    #[test]
    fn test_dup_not_first() {
        let mut mem = Memory::new(16);
        let result = DataInterpreter::new(&mut mem).interpret_section("a DB 1, 3 DUP (7)");

        assert_eq!(
            result.err(),
            Some(TokenError::Unexpected { expected: "',' or end of line", found: "DUP".to_string(), line: 1, column: 11 }.into()),
        );
        // Nothing expanded past the plain values
        assert_eq!(mem.top(), 2);
        assert_eq!(&mem.as_slice()[..3], &[1, 3, 0]);
    }

    #[test]
    fn test_mixed_layout() {
        let source = "var DB 64\nstr DB 'hello',0\nneco DB 9\nDB 9\nDB 9\nDW 9\nDW 9\nDD 9\nDD 9";
        let mem = layout(source).unwrap();

        assert_eq!(mem.symbol("var").unwrap().address, 0);
        assert_eq!(mem.symbol("str").unwrap().address, 1);
        assert_eq!(mem.symbol("neco").unwrap().address, 7);

        assert_eq!(mem.load_byte(6).unwrap(), 0);
        assert_eq!(mem.load_byte(8).unwrap(), 9);
        assert_eq!(mem.load_word(10).unwrap(), 9);
        assert_eq!(mem.load_word(12).unwrap(), 9);
        assert_eq!(mem.load_dword(14).unwrap(), 9);
        assert_eq!(mem.load_dword(18).unwrap(), 9);
        assert_eq!(mem.top(), 22);
    }

    #[test]
    fn test_truncate() {
        let mem = layout("a DB 257\nb DW 65537").unwrap();
        assert_eq!(mem.load_byte(0).unwrap(), 1);
        assert_eq!(mem.load_word(1).unwrap(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mem = layout("; header\n\na DB 1 ; one\n   \nb DB 2").unwrap();
        assert_eq!(&mem.as_slice()[..2], &[1, 2]);
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            layout("a DB 99999999999").err(),
            Some(TokenError::InvalidValue { lexeme: "99999999999".to_string(), width: Width::Byte, line: 1, column: 6 }.into()),
        );
        assert!(matches!(layout("a DW foo"), Err(Error::Token(TokenError::InvalidValue { .. }))));
        assert!(matches!(layout("a DD"), Err(Error::Token(TokenError::InvalidValue { .. }))));
    }

    #[test]
    fn test_missing_directive() {
        assert!(matches!(layout("a 5"), Err(Error::Token(TokenError::Unexpected { .. }))));
        assert!(matches!(layout("5 DB 1"), Err(Error::Token(TokenError::Unexpected { .. }))));
        assert!(matches!(layout("a DB 1 2"), Err(Error::Token(TokenError::Unexpected { .. }))));
    }

    #[test]
    fn test_duplicate_variable() {
        assert_eq!(
            layout("a DB 1\na DW 2").err(),
            Some(SymbolError::DuplicateVariable("a".to_string()).into()),
        );
    }

    #[test]
    fn test_out_of_memory() {
        let mut mem = Memory::new(4);
        let result = DataInterpreter::new(&mut mem).interpret_section("a DD 1, 2");
        assert!(matches!(result, Err(Error::Address(AddressError::OutOfBounds { address: 4, .. }))));
    }

    #[test]
    fn test_interpret_line() {
        let mut mem = Memory::new(8);
        let mut data = DataInterpreter::new(&mut mem);
        data.interpret_line("a DB 1 ; first").unwrap();
        data.interpret_line("b DW 2").unwrap();

        assert_eq!(mem.symbol("b").unwrap().address, 1);
        assert_eq!(mem.load_word(1).unwrap(), 2);
    }
}
