use std::iter::Peekable;
use std::str::Chars;

use crate::error::ScanError;


/// Cut every line at its first `;` that is not inside a quoted literal.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (i, line) in input.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(strip_line_comment(line));
    }
    out
}

pub fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;

    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, ';')               => return &line[..i],
            (None, '\'') | (None, '"') => quote = Some(c),
            (Some(q), c) if q == c    => quote = None,
            _                         => (),
        }
    }
    line
}


// Character reader shared by both section scanners
pub(crate) struct Lexer<'a> {
    input_iter: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer { input_iter: input.chars().peekable(), line: 1, column: 0 }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn read_char(&mut self) -> Option<char> {
        let c = self.input_iter.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    // Dont skip newlines
    pub fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if c.is_whitespace() && c != '\n' {
                self.read_char();
            } else {
                break;
            }
        }
    }

    pub fn read_while(&mut self, c: char, pred: impl Fn(char) -> bool) -> String {
        let mut run = String::new();
        run.push(c);

        while let Some(&c) = self.peek_char() {
            if pred(c) {
                run.push(c);
                self.read_char();
            } else {
                break;
            }
        }
        run
    }

    pub fn read_digits(&mut self, c: char) -> String {
        self.read_while(c, |c| c.is_ascii_digit())
    }

    pub fn read_ident(&mut self, c: char) -> String {
        self.read_while(c, |c| c.is_ascii_alphanumeric() || c == '_')
    }

    // Opening quote already consumed, lexeme keeps both quotes
    pub fn read_quoted(&mut self, quote: char, line: usize, column: usize) -> Result<String, ScanError> {
        let mut literal = String::new();
        literal.push(quote);

        loop {
            match self.peek_char() {
                None | Some('\n') => return Err(ScanError::UnterminatedLiteral { line, column }),
                Some(&c) => {
                    self.read_char();
                    literal.push(c);
                    if c == quote {
                        return Ok(literal);
                    }
                },
            }
        }
    }
}


/// Strip the surrounding quotes off a string literal lexeme.
pub fn unquote(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(_)) => &lexeme[1..lexeme.len() - 1],
        _                  => "",
    }
}


#[cfg(test)]
mod lexer_char {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let input = "var DB 64 ; a comment\n; whole line\nDB 1";
        assert_eq!(strip_comments(input), "var DB 64 \n\nDB 1");
    }

    #[test]
    fn test_strip_keeps_quoted_semicolon() {
        assert_eq!(strip_line_comment("s DB 'a;b' ; c"), "s DB 'a;b' ");
    }

    #[test]
    fn test_line_column() {
        let mut lexer = Lexer::new("ab\nc");
        lexer.read_char();
        lexer.read_char();
        assert_eq!((lexer.line(), lexer.column()), (1, 2));
        lexer.read_char();
        assert_eq!((lexer.line(), lexer.column()), (2, 0));
        lexer.read_char();
        assert_eq!((lexer.line(), lexer.column()), (2, 1));
    }

    #[test]
    fn test_unterminated() {
        let mut lexer = Lexer::new("abc\n'");
        lexer.read_char();
        assert_eq!(
            lexer.read_quoted('\'', 1, 1),
            Err(ScanError::UnterminatedLiteral { line: 1, column: 1 }),
        );
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'hi'"), "hi");
        assert_eq!(unquote("''"), "");
    }
}
