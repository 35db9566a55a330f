#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    pub kind: K,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl<K> Token<K> {
    pub fn new(kind: K, lexeme: impl Into<String>, line: usize, column: usize) -> Token<K> {
        Token { kind, lexeme: lexeme.into(), line, column }
    }
}


/// Fully materialized token buffer with an index cursor.
///
/// Reading past the end keeps returning the eof sentinel. The cursor can be
/// rewound any number of tokens, or moved to a previously saved position,
/// which is how labels and multi-token lookahead are implemented.
#[derive(Debug, Clone)]
pub struct TokenStream<K> {
    tokens: Vec<Token<K>>,
    cursor: usize,
    eof: Token<K>,
}

impl<K: Clone> TokenStream<K> {
    pub fn new(tokens: Vec<Token<K>>, eof: Token<K>) -> TokenStream<K> {
        TokenStream { tokens, cursor: 0, eof }
    }

    pub fn next_token(&mut self) -> Token<K> {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    pub fn peek(&self) -> &Token<K> {
        self.tokens.get(self.cursor).unwrap_or(&self.eof)
    }

    pub fn peek_nth(&self, n: usize) -> &Token<K> {
        self.tokens.get(self.cursor + n).unwrap_or(&self.eof)
    }

    pub fn push_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn seek(&mut self, position: usize) {
        self.cursor = position.min(self.tokens.len());
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &[Token<K>] {
        &self.tokens
    }
}
