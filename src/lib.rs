// src/lib.rs
//! Lexer generation: compile named regular-expression rules into one
//! deterministic table-driven scanner with greedy longest-match semantics
//! and declaration-order tie-breaking.
//!
//! Declare rules with [`Lexer::add_token`] / [`Lexer::ignore_token`], then
//! scan with [`Lexer::process`] (one token at a time) or [`Lexer::tokenize`]
//! (a whole stream). The first scan after a declaration compiles every
//! pattern into an NFA fragment, merges the fragments under one start state,
//! and determinizes the result into a dense transition table; the table is
//! cached until the next declaration.

pub mod determinize;
pub mod dfa;
pub mod error;
pub mod lexer;
pub mod nfa;
pub mod regex;
pub mod stream;
pub mod tables;
pub mod token;

pub use error::LexError;
pub use lexer::{EOF_ID, ERROR_ID, Lexer, MAX_ID, MAX_TOKEN_TYPES, TokenInfo};
pub use stream::ByteCursor;
pub use tables::Tables;
pub use token::{Token, TokenStream};
