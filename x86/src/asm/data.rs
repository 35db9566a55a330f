use crate::asm::lexer::{self, Lexer};
use crate::asm::token::{Token, TokenStream};
use crate::error::ScanError;
use crate::types::{self, Width};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Newline,
    Str,
    Word,
    Directive(Width),
    Dup,
    Number,
    EmptyValue,
    Separator,
    OpenParen,
    CloseParen,
    Eof,
}

pub type DataToken = Token<DataKind>;


/// Scan a whole data section (or a single line of it).
pub fn scan(input: &str) -> Result<TokenStream<DataKind>, ScanError> {
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
            '\n' => Token::new(DataKind::Newline, "\n", line, column),
            '?'  => Token::new(DataKind::EmptyValue, "?", line, column),
            ','  => Token::new(DataKind::Separator, ",", line, column),
            '('  => Token::new(DataKind::OpenParen, "(", line, column),
            ')'  => Token::new(DataKind::CloseParen, ")", line, column),
            '\'' | '"' => {
                let literal = lexer.read_quoted(c, line, column)?;
                Token::new(DataKind::Str, literal, line, column)
            },
            _ => {
                if c.is_ascii_alphabetic() || c == '_' {
                    let word = lexer.read_ident(c);
                    Token::new(classify(&word), word, line, column)
                } else if c.is_ascii_digit() {
                    Token::new(DataKind::Number, lexer.read_digits(c), line, column)
                } else {
                    return Err(ScanError::UnexpectedCharacter { character: c, line, column });
                }
            },
        };
        tokens.push(token);
    }

    let eof = Token::new(DataKind::Eof, "", lexer.line(), lexer.column() + 1);
    Ok(TokenStream::new(tokens, eof))
}

fn classify(word: &str) -> DataKind {
    if let Some(width) = types::directive_width(word) {
        DataKind::Directive(width)
    } else if word == "DUP" {
        DataKind::Dup
    } else {
        DataKind::Word
    }
}
