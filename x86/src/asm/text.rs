use crate::asm::lexer::{self, Lexer};
use crate::asm::token::{Token, TokenStream};
use crate::error::ScanError;
use crate::types::Width;
use crate::vm::regfile;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Newline,
    Separator,
    OpenBracket,
    CloseBracket,
    Plus,
    Minus,
    Times,
    Number,
    Word,
    Register,
    Size(Width),
    Label,
    Eof,
}

pub type TextToken = Token<TextKind>;


/// Scan a text block. Label lexemes keep their leading `.`.
pub fn scan(input: &str) -> Result<TokenStream<TextKind>, ScanError> {
    let input = lexer::strip_comments(input);
    let mut lexer = Lexer::new(&input);
    let mut tokens = Vec::new();

    loop {
        lexer.skip_whitespace();

        let line = lexer.line();
        let column = lexer.column() + 1;

        let c = match lexer.read_char() {
            Some(c) => c,
            None    => break,
        };

        let token = match c {
            '\n' => Token::new(TextKind::Newline, "\n", line, column),
            ','  => Token::new(TextKind::Separator, ",", line, column),
            '['  => Token::new(TextKind::OpenBracket, "[", line, column),
            ']'  => Token::new(TextKind::CloseBracket, "]", line, column),
            '+'  => Token::new(TextKind::Plus, "+", line, column),
            '-'  => Token::new(TextKind::Minus, "-", line, column),
            '*'  => Token::new(TextKind::Times, "*", line, column),
            '.'  => {
                match lexer.peek_char() {
                    Some(&n) if n.is_ascii_alphanumeric() || n == '_' => {
                        Token::new(TextKind::Label, lexer.read_ident(c), line, column)
                    },
                    _ => return Err(ScanError::UnexpectedCharacter { character: c, line, column }),
                }
            },
            _ => {
                if c.is_ascii_alphabetic() || c == '_' {
                    let word = lexer.read_ident(c);
                    Token::new(classify(&word), word, line, column)
                } else if c.is_ascii_digit() {
                    Token::new(TextKind::Number, lexer.read_digits(c), line, column)
                } else {
                    return Err(ScanError::UnexpectedCharacter { character: c, line, column });
                }
            },
        };
        tokens.push(token);
    }

    let eof = Token::new(TextKind::Eof, "", lexer.line(), lexer.column() + 1);
    Ok(TokenStream::new(tokens, eof))
}

fn classify(word: &str) -> TextKind {
    if regfile::lookup(word).is_some() {
        TextKind::Register
    } else if word == "PTR" {
        TextKind::Word
    } else if let Ok(width) = word.parse::<Width>() {
        TextKind::Size(width)
    } else {
        TextKind::Word
    }
}


#[cfg(test)]
pub mod lexer_token {
    use super::*;

    fn kinds(input: &str) -> Vec<TextKind> {
        let stream = scan(input).unwrap();
        stream.tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_instruction() {
        assert_eq!(kinds("mov eax, ebx"), vec![
            TextKind::Word, TextKind::Register, TextKind::Separator, TextKind::Register,
        ]);
    }

    #[test]
    fn test_address() {
        assert_eq!(kinds("mov DWORD PTR [eax + 4*ebx - 2], 1"), vec![
            TextKind::Word, TextKind::Size(Width::Dword), TextKind::Word,
            TextKind::OpenBracket, TextKind::Register, TextKind::Plus, TextKind::Number,
            TextKind::Times, TextKind::Register, TextKind::Minus, TextKind::Number,
            TextKind::CloseBracket, TextKind::Separator, TextKind::Number,
        ]);
    }

    #[test]
    fn test_label() {
        let stream = scan("  .loop_1 ; top\njmp .loop_1").unwrap();

        let expected = vec![
            Token::new(TextKind::Label, ".loop_1", 1, 3),
            Token::new(TextKind::Newline, "\n", 1, 11),
            Token::new(TextKind::Word, "jmp", 2, 1),
            Token::new(TextKind::Label, ".loop_1", 2, 5),
        ];
        assert_eq!(stream.tokens(), &expected[..]);
        assert_eq!(stream.peek_nth(4).kind, TextKind::Eof);
    }

    #[test]
    fn test_register_views() {
        for name in ["eax", "ax", "al", "ah", "esi", "si", "sil", "esp", "spl", "bpl"] {
            assert_eq!(kinds(name), vec![TextKind::Register], "{}", name);
        }
        // No high byte views past edx
        assert_eq!(kinds("sih"), vec![TextKind::Word]);
        assert_eq!(kinds("EAX"), vec![TextKind::Word]);
    }

    #[test]
    fn test_lone_dot() {
        assert_eq!(
            scan("jmp . x").unwrap_err(),
            ScanError::UnexpectedCharacter { character: '.', line: 1, column: 5 },
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            scan("mov eax, 'a'").unwrap_err(),
            ScanError::UnexpectedCharacter { character: '\'', line: 1, column: 10 },
        );
    }
}
