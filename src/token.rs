// src/token.rs

/// One token recognized in an input stream.
///
/// The id space: 0 is end-of-input, negative ids are recognition failures,
/// 1..=127 name raw single bytes, and ids from 128 up are declared types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: i32,
    /// Matched text (empty if the type was declared with `save_lexeme` off).
    pub lexeme: String,
    /// 1-based line on which this token starts.
    pub line: usize,
}

impl Token {
    pub fn new(id: i32, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            id,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.id == 0
    }

    pub fn is_error(&self) -> bool {
        self.id < 0
    }
}

/// All visible tokens from one full scan of a named input, in order.
/// Immutable once built; supports bounds-checked indexing and iteration in
/// both directions.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    name: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&Token> {
        self.tokens.get(pos)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl std::ops::Index<usize> for TokenStream {
    type Output = Token;
    fn index(&self, pos: usize) -> &Token {
        &self.tokens[pos]
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;
    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
