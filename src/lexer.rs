// src/lexer.rs
// Token registry and the table-driven scanner built on top of the compiled
// DFA. Declarations accumulate here; the DFA is a cached artifact, rebuilt
// lazily on the first scan after any declaration.

use std::io::{self, Read};

use hashbrown::HashMap;

use crate::determinize::determinize;
use crate::dfa::Dfa;
use crate::error::LexError;
use crate::nfa::{Nfa, StopTag};
use crate::regex::Regex;
use crate::stream::ByteCursor;
use crate::token::{Token, TokenStream};

/// Ids count down from here so earlier declarations get larger ids.
pub const MAX_ID: i32 = 255;
/// Ids below this collide with the raw single-byte range and are never
/// assigned; the spread gives the declarable-type capacity.
pub const MIN_ID: i32 = 128;
/// Id reported for input no declared pattern matches.
pub const ERROR_ID: i32 = -1;
/// Id reported exactly once when an input stream is exhausted.
pub const EOF_ID: i32 = 0;

/// Hard ceiling on declared token types per registry.
pub const MAX_TOKEN_TYPES: usize = (MAX_ID - MIN_ID + 1) as usize;

/// One declared token type.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub name: String,
    pub desc: String,
    pub pattern: String,
    pub(crate) regex: Regex,
    /// Public id, assigned by counting down from [`MAX_ID`].
    pub id: i32,
    /// Declaration index (0 = first declared); the tie-break priority field.
    pub rank: u16,
    pub save_lexeme: bool,
    pub save_token: bool,
}

/// A lexer: a set of named token types with patterns, plus the scan entry
/// points. Declaring any type invalidates the compiled DFA; the next scan
/// triggers a full rebuild (pattern compile -> merge -> determinize).
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    token_set: Vec<TokenInfo>,
    token_map: HashMap<String, i32>,
    dfa: Option<Dfa>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many token types have been declared.
    pub fn num_tokens(&self) -> usize {
        self.token_set.len()
    }

    /// Drop all declarations and any compiled DFA.
    pub fn reset(&mut self) {
        self.token_set.clear();
        self.token_map.clear();
        self.dfa = None;
    }

    /// Declare a token type. Returns its id; earlier declarations receive
    /// larger ids and win equal-length match ties.
    pub fn add_token(&mut self, name: &str, pattern: &str) -> Result<i32, LexError> {
        self.add_token_full(name, pattern, true, true, "")
    }

    /// Declare a token type with full control over the save flags.
    pub fn add_token_full(
        &mut self,
        name: &str,
        pattern: &str,
        save_lexeme: bool,
        save_token: bool,
        desc: &str,
    ) -> Result<i32, LexError> {
        if self.token_map.contains_key(name) {
            return Err(LexError::DuplicateName(name.to_owned()));
        }
        let id = MAX_ID - self.token_set.len() as i32;
        if id < MIN_ID {
            return Err(LexError::CapacityExceeded {
                max: MAX_TOKEN_TYPES,
            });
        }
        let regex = Regex::parse(pattern)?;
        let rank = self.token_set.len() as u16;
        self.token_set.push(TokenInfo {
            name: name.to_owned(),
            desc: desc.to_owned(),
            pattern: pattern.to_owned(),
            regex,
            id,
            rank,
            save_lexeme,
            save_token,
        });
        self.token_map.insert(name.to_owned(), id);
        self.dfa = None;
        Ok(id)
    }

    /// Declare a token type that is recognized but never reported, such as
    /// whitespace or comments.
    pub fn ignore_token(&mut self, name: &str, pattern: &str, desc: &str) -> Result<i32, LexError> {
        self.add_token_full(name, pattern, false, false, desc)
    }

    /// Look up an id by name. A single-character name that was never declared
    /// falls back to its raw byte value, so individual characters can always
    /// be referenced.
    pub fn token_id(&self, name: &str) -> Result<i32, LexError> {
        if let Some(&id) = self.token_map.get(name) {
            return Ok(id);
        }
        match name.as_bytes() {
            [b] => Ok(*b as i32),
            _ => Err(LexError::UnknownTokenName(name.to_owned())),
        }
    }

    /// Full information about a declared token type, by id.
    pub fn token_info(&self, id: i32) -> Option<&TokenInfo> {
        if id > MAX_ID || id <= MAX_ID - self.token_set.len() as i32 {
            return None;
        }
        self.token_set.get((MAX_ID - id) as usize)
    }

    /// Render an id as a name: `EOF` for 0, an escaped character for the raw
    /// byte range, the declared name otherwise.
    pub fn token_name(&self, id: i32) -> String {
        if id < 0 {
            return format!("Error ({id})");
        }
        if id == EOF_ID {
            return "EOF".to_owned();
        }
        if id < MIN_ID {
            return escape_byte(id as u8);
        }
        match self.token_info(id) {
            Some(info) => info.name.clone(),
            None => format!("Error ({id})"),
        }
    }

    /// Whether tokens of this type survive into a `TokenStream`. Unknown ids
    /// (including raw bytes) default to kept.
    pub fn save_token(&self, id: i32) -> bool {
        self.token_info(id).is_none_or(|info| info.save_token)
    }

    /// The compiled DFA, rebuilt if any declaration happened since the last
    /// build. Clone it to share a snapshot across independent scanners.
    pub fn dfa(&mut self) -> &Dfa {
        if self.dfa.is_none() {
            let mut nfa = Nfa::new(1);
            for info in &self.token_set {
                nfa.merge(&info.regex.to_nfa(StopTag {
                    id: info.id as u16,
                    rank: info.rank,
                }));
            }
            let dfa = determinize(&nfa);
            log::debug!(
                "compiled lexer: {} token types, {} NFA states -> {} DFA states",
                self.token_set.len(),
                nfa.len(),
                dfa.n_states()
            );
            self.dfa = Some(dfa);
        }
        match &self.dfa {
            Some(dfa) => dfa,
            None => unreachable!("dfa was just built"),
        }
    }

    /// Scan one token from the cursor: greedy longest match. The DFA is
    /// walked one byte at a time; every accepting state visited is recorded
    /// as the best match so far, and when no further progress is possible the
    /// cursor is rewound to the end of the best match.
    ///
    /// No match at all yields an error token carrying the consumed prefix as
    /// its lexeme (empty input yields the EOF token). The returned token's
    /// `line` is 0; callers doing line tracking stamp it.
    pub fn process<R: Read>(&mut self, cursor: &mut ByteCursor<R>) -> io::Result<Token> {
        let dfa = self.dfa();
        let mut state = dfa.start();
        let mut lexeme: Vec<u8> = Vec::new();
        let mut best_len = 0usize;
        let mut best_stop = ERROR_ID;

        while let Some(byte) = cursor.next()? {
            match dfa.next(state, byte) {
                Some(next) => {
                    state = next;
                    lexeme.push(byte);
                    let stop = dfa.stop(state);
                    if stop > 0 {
                        best_len = lexeme.len();
                        best_stop = stop;
                    }
                }
                None => {
                    // Dead end; the unmatched byte still belongs to the
                    // prefix unless a recorded match claims less.
                    lexeme.push(byte);
                    break;
                }
            }
        }

        if best_stop < 0 {
            if lexeme.is_empty() {
                return Ok(Token::new(EOF_ID, "", 0));
            }
            return Ok(Token::new(ERROR_ID, lossy(&lexeme), 0));
        }

        if best_len < lexeme.len() {
            cursor.push_back(&lexeme[best_len..]);
            lexeme.truncate(best_len);
        }
        Ok(Token::new(best_stop, lossy(&lexeme), 0))
    }

    /// Scan until a visible (non-ignored) token, EOF, or failure. `line` is
    /// advanced across every newline consumed, including those inside ignored
    /// lexemes, and the returned token is stamped with its starting line.
    pub fn process_visible<R: Read>(
        &mut self,
        cursor: &mut ByteCursor<R>,
        line: &mut usize,
    ) -> io::Result<Token> {
        loop {
            let mut token = self.process(cursor)?;
            token.line = *line;
            if token.id <= 0 {
                return Ok(token);
            }
            *line += token.lexeme.bytes().filter(|&b| b == b'\n').count();
            match self.token_info(token.id) {
                Some(info) if !info.save_token => continue,
                Some(info) if !info.save_lexeme => {
                    token.lexeme.clear();
                    return Ok(token);
                }
                _ => return Ok(token),
            }
        }
    }

    /// Scan a whole input stream into a `TokenStream` of visible tokens.
    /// A recognition failure ends the scan and is kept as the stream's last
    /// token, so callers can see where and why lexing stopped.
    pub fn tokenize<R: Read>(&mut self, reader: R, name: &str) -> io::Result<TokenStream> {
        let mut cursor = ByteCursor::new(reader);
        let mut line = 1usize;
        let mut tokens = Vec::new();
        loop {
            let token = self.process_visible(&mut cursor, &mut line)?;
            if token.id <= 0 {
                if token.is_error() {
                    tokens.push(token);
                }
                break;
            }
            tokens.push(token);
        }
        Ok(TokenStream::new(tokens, name))
    }

    /// `tokenize` over an in-memory string.
    pub fn tokenize_str(&mut self, text: &str, name: &str) -> TokenStream {
        match self.tokenize(text.as_bytes(), name) {
            Ok(stream) => stream,
            Err(_) => unreachable!("in-memory reads cannot fail"),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Printable rendering of a raw byte id, control characters escaped.
fn escape_byte(b: u8) -> String {
    match b {
        b'\n' => "'\\n'".to_owned(),
        b'\r' => "'\\r'".to_owned(),
        b'\t' => "'\\t'".to_owned(),
        b'\\' => "'\\\\'".to_owned(),
        b'\'' => "'\\''".to_owned(),
        0x20..=0x7e => format!("'{}'", b as char),
        _ => format!("'\\x{b:02x}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_down_from_the_ceiling() {
        let mut lexer = Lexer::new();
        assert_eq!(lexer.add_token("First", "a").unwrap(), 255);
        assert_eq!(lexer.add_token("Second", "b").unwrap(), 254);
        assert_eq!(lexer.token_info(255).map(|t| t.rank), Some(0));
        assert_eq!(lexer.token_info(254).map(|t| t.rank), Some(1));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut lexer = Lexer::new();
        lexer.add_token("X", "x").unwrap();
        assert_eq!(
            lexer.add_token("X", "y"),
            Err(LexError::DuplicateName("X".to_owned()))
        );
    }

    #[test]
    fn bad_patterns_fail_at_declaration_time() {
        let mut lexer = Lexer::new();
        assert!(matches!(
            lexer.add_token("Broken", "(ab"),
            Err(LexError::InvalidPattern { .. })
        ));
        // The failed declaration must not occupy a slot.
        assert_eq!(lexer.num_tokens(), 0);
        assert_eq!(lexer.add_token("Ok", "ab").unwrap(), 255);
    }

    #[test]
    fn token_id_falls_back_to_raw_bytes() {
        let mut lexer = Lexer::new();
        let plus = lexer.add_token("Plus", "\\+").unwrap();
        assert_eq!(lexer.token_id("Plus"), Ok(plus));
        assert_eq!(lexer.token_id("+"), Ok(b'+' as i32));
        assert_eq!(
            lexer.token_id("NoSuch"),
            Err(LexError::UnknownTokenName("NoSuch".to_owned()))
        );
    }

    #[test]
    fn token_name_renders_the_fixed_ids() {
        let mut lexer = Lexer::new();
        lexer.add_token("Word", "\\w+").unwrap();
        assert_eq!(lexer.token_name(0), "EOF");
        assert_eq!(lexer.token_name(b'a' as i32), "'a'");
        assert_eq!(lexer.token_name(b'\n' as i32), "'\\n'");
        assert_eq!(lexer.token_name(255), "Word");
        assert_eq!(lexer.token_name(-1), "Error (-1)");
        assert_eq!(lexer.token_name(200), "Error (200)");
    }

    #[test]
    fn reset_drops_all_declarations() {
        let mut lexer = Lexer::new();
        lexer.add_token("A", "a").unwrap();
        lexer.reset();
        assert_eq!(lexer.num_tokens(), 0);
        assert_eq!(lexer.add_token("B", "b").unwrap(), MAX_ID);
        assert!(lexer.save_token(MAX_ID));
    }

    #[test]
    fn declarations_invalidate_the_compiled_dfa() {
        let mut lexer = Lexer::new();
        lexer.add_token("A", "a").unwrap();
        let before = lexer.dfa().n_states();
        lexer.add_token("Long", "abcdef").unwrap();
        let after = lexer.dfa().n_states();
        assert!(after > before);
    }
}
