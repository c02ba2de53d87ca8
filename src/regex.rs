// src/regex.rs
// Pattern mini-language -> syntax tree -> Thompson NFA fragment.
//
// Supported syntax:
//   c        literal byte (metacharacters below need escaping)
//   .        any byte except '\n'
//   [...]    byte class; ranges a-z; '^' first negates; '-' first/last is literal
//   "..."    quoted literal run, metacharacters matched verbatim
//   (...)    grouping
//   X|Y      alternation
//   X? X* X+ quantifiers
//   X{n} X{n,} X{n,m}  counted repeats
//   \d \D \l \L \s \S \w \W  class shortcuts; \t \n \r \f \v escapes

use crate::error::LexError;
use crate::nfa::{Nfa, StopTag, SymbolSet};

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const WHITESPACE: &[u8] = b" \x0c\n\r\t\x0b";
const WORD: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// A run of specific bytes, matched in order.
    Literal(Vec<u8>),
    /// Any one byte from the set.
    Class(SymbolSet),
    Concat(Vec<Node>),
    Or(Box<Node>, Box<Node>),
    Star(Box<Node>),
    Plus(Box<Node>),
    Opt(Box<Node>),
    Repeat {
        node: Box<Node>,
        min: u32,
        max: Option<u32>,
    },
}

/// A compiled pattern, ready to be lowered into an NFA fragment.
#[derive(Debug, Clone)]
pub struct Regex {
    src: String,
    head: Node,
}

impl Regex {
    /// Parse a pattern. All syntax errors surface here, at declaration time.
    pub fn parse(pattern: &str) -> Result<Self, LexError> {
        let mut p = Parser {
            pattern,
            bytes: pattern.as_bytes(),
            pos: 0,
        };
        if p.bytes.is_empty() {
            return Err(p.err(0, "empty pattern"));
        }
        let head = p.parse_alt()?;
        if p.pos < p.bytes.len() {
            // Only an unbalanced ')' can stop parse_alt early.
            return Err(p.err(p.pos, "unbalanced ')'"));
        }
        Ok(Self {
            src: pattern.to_owned(),
            head,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.src
    }

    /// Lower this pattern into `nfa` between the given entry and exit states.
    pub fn add_to_nfa(&self, nfa: &mut Nfa, start: u32, stop: u32) {
        lower(&self.head, nfa, start, stop);
    }

    /// Build a standalone two-state fragment whose accept state carries `tag`.
    pub fn to_nfa(&self, tag: StopTag) -> Nfa {
        let mut nfa = Nfa::new(2);
        nfa.set_stop(1, tag);
        self.add_to_nfa(&mut nfa, 0, 1);
        nfa
    }
}

fn lower(node: &Node, nfa: &mut Nfa, start: u32, stop: u32) {
    match node {
        Node::Literal(bytes) => {
            let mut prev = start;
            for &b in bytes {
                let next = nfa.add_state();
                nfa.add_byte_transition(prev, next, b);
                prev = next;
            }
            nfa.add_free_transition(prev, stop);
        }
        Node::Class(set) => {
            nfa.add_transition(start, stop, *set);
        }
        Node::Concat(nodes) => {
            let mut prev = start;
            for n in nodes {
                let next = nfa.add_state();
                lower(n, nfa, prev, next);
                prev = next;
            }
            nfa.add_free_transition(prev, stop);
        }
        Node::Or(lhs, rhs) => {
            lower(lhs, nfa, start, stop);
            lower(rhs, nfa, start, stop);
        }
        Node::Star(inner) => {
            let origin = nfa.add_state();
            let target = nfa.add_state();
            lower(inner, nfa, origin, target);
            nfa.add_free_transition(start, origin);
            nfa.add_free_transition(target, origin);
            nfa.add_free_transition(origin, stop);
        }
        Node::Plus(inner) => {
            let origin = nfa.add_state();
            let target = nfa.add_state();
            lower(inner, nfa, origin, target);
            nfa.add_free_transition(start, origin);
            nfa.add_free_transition(target, origin);
            nfa.add_free_transition(target, stop);
        }
        Node::Opt(inner) => {
            lower(inner, nfa, start, stop);
            nfa.add_free_transition(start, stop);
        }
        Node::Repeat { node, min, max } => {
            let mut cur = nfa.add_state();
            nfa.add_free_transition(start, cur);

            // Required copies first.
            for _ in 0..*min {
                let next = nfa.add_state();
                lower(node, nfa, cur, next);
                cur = next;
            }

            match max {
                // Unbounded tail: one more copy that can loop or be skipped.
                None => {
                    let next = nfa.add_state();
                    lower(node, nfa, cur, next);
                    nfa.add_free_transition(cur, next);
                    nfa.add_free_transition(next, cur);
                    cur = next;
                }
                // Bounded: each optional copy can be skipped over.
                Some(max) => {
                    for _ in 0..max.saturating_sub(*min) {
                        let next = nfa.add_state();
                        lower(node, nfa, cur, next);
                        nfa.add_free_transition(cur, next);
                        cur = next;
                    }
                }
            }

            nfa.add_free_transition(cur, stop);
        }
    }
}

struct Parser<'a> {
    pattern: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn err(&self, pos: usize, msg: impl Into<String>) -> LexError {
        LexError::InvalidPattern {
            pattern: self.pattern.to_owned(),
            pos,
            msg: msg.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, b: u8) -> Result<(), LexError> {
        match self.peek() {
            Some(got) if got == b => {
                self.pos += 1;
                Ok(())
            }
            Some(got) => Err(self.err(
                self.pos,
                format!("expected '{}', found '{}'", b as char, got as char),
            )),
            None => Err(self.err(self.pos, format!("expected '{}' before end", b as char))),
        }
    }

    // alt := concat ('|' concat)*
    fn parse_alt(&mut self) -> Result<Node, LexError> {
        let mut node = self.parse_concat()?;
        while self.peek() == Some(b'|') {
            self.pos += 1;
            if self.peek().is_none() || self.peek() == Some(b')') {
                return Err(self.err(self.pos, "missing right-hand side of '|'"));
            }
            let rhs = self.parse_concat()?;
            node = Node::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    // concat := postfix+
    fn parse_concat(&mut self) -> Result<Node, LexError> {
        let mut nodes: Vec<Node> = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'|') | Some(b')') => break,
                _ => {}
            }
            let node = self.parse_postfix()?;
            // Fold adjacent literal runs so "abc" is one chain, not three.
            if let (Some(Node::Literal(prev)), Node::Literal(cur)) = (nodes.last_mut(), &node) {
                prev.extend_from_slice(cur);
                continue;
            }
            nodes.push(node);
        }
        match nodes.len() {
            0 => Err(self.err(self.pos, "expected a pattern segment")),
            1 => Ok(nodes.pop().unwrap_or(Node::Literal(Vec::new()))),
            _ => Ok(Node::Concat(nodes)),
        }
    }

    // postfix := segment ('*' | '+' | '?' | '{' repeat '}')*
    fn parse_postfix(&mut self) -> Result<Node, LexError> {
        let mut node = self.parse_segment()?;
        loop {
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    node = Node::Star(Box::new(node));
                }
                Some(b'+') => {
                    self.pos += 1;
                    node = Node::Plus(Box::new(node));
                }
                Some(b'?') => {
                    self.pos += 1;
                    node = Node::Opt(Box::new(node));
                }
                Some(b'{') => {
                    self.pos += 1;
                    let (min, max) = self.parse_repeat()?;
                    node = Node::Repeat {
                        node: Box::new(node),
                        min,
                        max,
                    };
                }
                _ => return Ok(node),
            }
        }
    }

    // Body of an {n} / {n,} / {n,m} repeat; '{' already consumed.
    fn parse_repeat(&mut self) -> Result<(u32, Option<u32>), LexError> {
        let min = self.parse_int()?;
        let max = if self.peek() == Some(b',') {
            self.pos += 1;
            if self.peek() == Some(b'}') {
                None
            } else {
                Some(self.parse_int()?)
            }
        } else {
            Some(min)
        };
        self.expect(b'}')?;
        if let Some(max) = max
            && max < min
        {
            return Err(self.err(self.pos, format!("repeat range {{{min},{max}}} is inverted")));
        }
        Ok((min, max))
    }

    fn parse_int(&mut self) -> Result<u32, LexError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err(start, "expected a number in repeat specifier"));
        }
        self.pattern[start..self.pos]
            .parse::<u32>()
            .map_err(|_| self.err(start, "repeat count out of range"))
    }

    // One atomic unit: literal, '.', group, class, quoted run, or escape.
    fn parse_segment(&mut self) -> Result<Node, LexError> {
        let at = self.pos;
        let c = self
            .bump()
            .ok_or_else(|| self.err(at, "expected a pattern segment"))?;
        match c {
            b'.' => {
                let mut set = SymbolSet::single(b'\n');
                set.negate();
                Ok(Node::Class(set))
            }
            b'(' => {
                let node = self.parse_alt()?;
                self.expect(b')')?;
                Ok(node)
            }
            b'[' => {
                let set = self.parse_class(at)?;
                self.expect(b']')?;
                Ok(Node::Class(set))
            }
            b'"' => {
                let bytes = self.parse_quoted(at)?;
                self.expect(b'"')?;
                Ok(Node::Literal(bytes))
            }
            b'\\' => self.parse_escape(at),
            b'|' | b'*' | b'+' | b'?' | b')' | b'{' => Err(self.err(
                at,
                format!("'{}' needs a preceding segment", c as char),
            )),
            _ => Ok(Node::Literal(vec![c])),
        }
    }

    // Bytes of a quoted run; everything is verbatim, '\' escapes the next
    // byte. The closing '"' is left for the caller.
    fn parse_quoted(&mut self, open_at: usize) -> Result<Vec<u8>, LexError> {
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'"') => return Ok(bytes),
                Some(b'\\') => {
                    self.pos += 1;
                    let b = self
                        .bump()
                        .ok_or_else(|| self.err(open_at, "unterminated quoted literal"))?;
                    bytes.push(b);
                }
                Some(b) => {
                    self.pos += 1;
                    bytes.push(b);
                }
            }
        }
    }

    fn parse_escape(&mut self, at: usize) -> Result<Node, LexError> {
        let c = self
            .bump()
            .ok_or_else(|| self.err(at, "dangling '\\' at end of pattern"))?;
        let node = match c {
            b'd' => Node::Class(SymbolSet::from_bytes(DIGITS)),
            b'D' => Node::Class(negated(SymbolSet::from_bytes(DIGITS))),
            b'l' => Node::Class(SymbolSet::from_bytes(LETTERS)),
            b'L' => Node::Class(negated(SymbolSet::from_bytes(LETTERS))),
            b's' => Node::Class(SymbolSet::from_bytes(WHITESPACE)),
            b'S' => Node::Class(negated(SymbolSet::from_bytes(WHITESPACE))),
            b'w' => Node::Class(SymbolSet::from_bytes(WORD)),
            b'W' => Node::Class(negated(SymbolSet::from_bytes(WORD))),
            b'f' => Node::Literal(vec![0x0c]),
            b'n' => Node::Literal(vec![b'\n']),
            b'r' => Node::Literal(vec![b'\r']),
            b't' => Node::Literal(vec![b'\t']),
            b'v' => Node::Literal(vec![0x0b]),
            _ if c.is_ascii_punctuation() => Node::Literal(vec![c]),
            _ => return Err(self.err(at, format!("unknown escape '\\{}'", c as char))),
        };
        Ok(node)
    }

    // Inside of a [...] class; opening '[' already consumed.
    fn parse_class(&mut self, open_at: usize) -> Result<SymbolSet, LexError> {
        let mut set = SymbolSet::empty();
        let negate = if self.peek() == Some(b'^') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut prev: Option<u8> = None;
        loop {
            let at = self.pos;
            let c = match self.peek() {
                None => return Err(self.err(open_at, "unterminated character class")),
                Some(b']') => break,
                Some(c) => {
                    self.pos += 1;
                    c
                }
            };

            // A '-' between two members denotes a range; first or last it is
            // an ordinary member.
            if c == b'-'
                && let Some(lo) = prev
                && !matches!(self.peek(), None | Some(b']'))
            {
                let hi_at = self.pos;
                let hi = self.class_byte()?;
                if hi < lo {
                    return Err(self.err(
                        hi_at,
                        format!("inverted range {}-{}", lo as char, hi as char),
                    ));
                }
                set.union_with(&SymbolSet::range(lo, hi));
                prev = None;
                continue;
            }

            let b = if c == b'\\' {
                self.pos = at; // class_byte handles the backslash itself
                self.class_byte()?
            } else {
                c
            };
            set.insert(b);
            prev = Some(b);
        }

        if negate {
            set.negate();
        }
        Ok(set)
    }

    // One member byte inside a class, resolving escapes.
    fn class_byte(&mut self) -> Result<u8, LexError> {
        let at = self.pos;
        let c = self
            .bump()
            .ok_or_else(|| self.err(at, "unterminated character class"))?;
        if c != b'\\' {
            return Ok(c);
        }
        let e = self
            .bump()
            .ok_or_else(|| self.err(at, "dangling '\\' in character class"))?;
        match e {
            b'f' => Ok(0x0c),
            b'n' => Ok(b'\n'),
            b'r' => Ok(b'\r'),
            b't' => Ok(b'\t'),
            b'v' => Ok(0x0b),
            b'0'..=b'9' => {
                // \ddd: exactly three decimal digits naming a byte value.
                let d2 = self.bump();
                let d3 = self.bump();
                match (d2, d3) {
                    (Some(d2), Some(d3)) if d2.is_ascii_digit() && d3.is_ascii_digit() => {
                        let v = (e - b'0') as u16 * 100 + (d2 - b'0') as u16 * 10 + (d3 - b'0') as u16;
                        u8::try_from(v)
                            .map_err(|_| self.err(at, "escaped byte code must be 0-255"))
                    }
                    _ => Err(self.err(at, "escaped byte codes need three digits")),
                }
            }
            _ if e.is_ascii_punctuation() => Ok(e),
            _ => Err(self.err(at, format!("unknown class escape '\\{}'", e as char))),
        }
    }
}

fn negated(mut set: SymbolSet) -> SymbolSet {
    set.negate();
    set
}
