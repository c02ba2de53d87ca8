//! Scan-semantics tests: greedy longest match, declaration-order tie-breaks,
//! ignored-token line tracking, capacity, and end-of-input behavior.

use lexsmith::{ByteCursor, LexError, Lexer};

fn ids_and_lexemes(lexer: &mut Lexer, input: &str) -> Vec<(i32, String)> {
    lexer
        .tokenize_str(input, "test")
        .iter()
        .map(|t| (t.id, t.lexeme.clone()))
        .collect()
}

#[test]
fn longest_match_beats_declaration_order() {
    let mut lexer = Lexer::new();
    let a = lexer.add_token("A", "a").unwrap();
    let aa = lexer.add_token("AA", "aa").unwrap();

    // "aaa" must scan as AA + A, never as three A's.
    let tokens = ids_and_lexemes(&mut lexer, "aaa");
    assert_eq!(
        tokens,
        vec![(aa, "aa".to_owned()), (a, "a".to_owned())]
    );

    // Same outcome with the declarations reversed.
    let mut lexer = Lexer::new();
    let aa = lexer.add_token("AA", "aa").unwrap();
    let a = lexer.add_token("A", "a").unwrap();
    let tokens = ids_and_lexemes(&mut lexer, "aaa");
    assert_eq!(
        tokens,
        vec![(aa, "aa".to_owned()), (a, "a".to_owned())]
    );
}

fn word_lexer() -> Lexer {
    let mut lexer = Lexer::new();
    lexer.add_token("Integer", "[0-9]+").unwrap();
    lexer.add_token("Float", "[0-9]*\\.[0-9]+").unwrap();
    lexer.add_token("Lower", "[a-z]+").unwrap();
    lexer.add_token("Upper", "[A-Z]+").unwrap();
    lexer.add_token("Mixed", "[a-zA-Z]+").unwrap();
    lexer.add_token("Whitespace", "[ \\t\\n\\r]").unwrap();
    lexer.add_token("Other", ".").unwrap();
    lexer
}

#[test]
fn equal_length_ties_go_to_the_earlier_declaration() {
    let mut lexer = word_lexer();
    let lower = lexer.token_id("Lower").unwrap();
    let upper = lexer.token_id("Upper").unwrap();
    let mixed = lexer.token_id("Mixed").unwrap();
    let white = lexer.token_id("Whitespace").unwrap();

    // "is" satisfies both Lower and Mixed at length 2; Lower came first.
    assert_eq!(ids_and_lexemes(&mut lexer, "is"), vec![(lower, "is".to_owned())]);
    // Upper-vs-Mixed follows the same rule.
    assert_eq!(ids_and_lexemes(&mut lexer, "IS"), vec![(upper, "IS".to_owned())]);
    // A single space satisfies both Whitespace and Other.
    assert_eq!(ids_and_lexemes(&mut lexer, " "), vec![(white, " ".to_owned())]);
    // Genuinely mixed case only satisfies Mixed at full length.
    assert_eq!(ids_and_lexemes(&mut lexer, "Is"), vec![(mixed, "Is".to_owned())]);
}

#[test]
fn longest_match_still_wins_across_tied_patterns() {
    let mut lexer = word_lexer();
    let float = lexer.token_id("Float").unwrap();
    // Integer matches "3", Float matches "3.5"; the longer match wins even
    // though Integer was declared first.
    assert_eq!(
        ids_and_lexemes(&mut lexer, "3.5"),
        vec![(float, "3.5".to_owned())]
    );
}

#[test]
fn vowel_containment_example() {
    let mut lexer = Lexer::new();
    let vowel = lexer.add_token("vowel", "[a-z]*([aeiou])+[a-z]*").unwrap();

    let tokens = ids_and_lexemes(&mut lexer, "hello");
    assert_eq!(tokens, vec![(vowel, "hello".to_owned())]);

    // No prefix of "why" contains a vowel, so the scan fails; the failure
    // token carries the consumed prefix for diagnostics.
    let tokens = lexer.tokenize_str("why", "test");
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_error());
    assert_eq!(tokens[0].lexeme, "why");
}

#[test]
fn ignored_tokens_still_advance_line_numbers() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();
    lexer
        .ignore_token("Comment", "\"//\".*\\n", "line comment, newline included")
        .unwrap();
    lexer.ignore_token("White", "[ \\t\\n\\r]+", "").unwrap();

    let src = "one // note\n\n  two\nthree";
    let stream = lexer.tokenize_str(src, "lines");
    let lines: Vec<(String, usize)> = stream
        .iter()
        .map(|t| (t.lexeme.clone(), t.line))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("one".to_owned(), 1),
            ("two".to_owned(), 3),
            ("three".to_owned(), 4),
        ]
    );
}

#[test]
fn visible_lexemes_round_trip() {
    let mut lexer = Lexer::new();
    lexer.add_token("Ident", "[a-zA-Z_]\\w*").unwrap();
    lexer.add_token("Int", "[0-9]+").unwrap();
    lexer.add_token("EqEq", "\"==\"").unwrap();
    lexer.add_token("Assign", "=").unwrap();
    lexer.ignore_token("White", "[ \\t\\n\\r]+", "").unwrap();

    let first = ids_and_lexemes(&mut lexer, "foo = 12\nbar == foo");
    let joined: String = first.iter().map(|(_, lexeme)| lexeme.as_str()).collect();
    let second = ids_and_lexemes(&mut lexer, &joined);
    assert_eq!(first, second);
}

#[test]
fn save_lexeme_off_drops_text_but_keeps_the_token() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();
    let marker = lexer
        .add_token_full("Marker", "@+", false, true, "kept, text discarded")
        .unwrap();

    let tokens = lexer.tokenize_str("abc@@@def", "flags");
    let pairs: Vec<(i32, &str)> = tokens.iter().map(|t| (t.id, t.lexeme.as_str())).collect();
    let word = lexer.token_id("Word").unwrap();
    assert_eq!(pairs, vec![(word, "abc"), (marker, ""), (word, "def")]);
}

#[test]
fn capacity_is_a_hard_ceiling() {
    let mut lexer = Lexer::new();
    for i in 0..lexsmith::MAX_TOKEN_TYPES {
        lexer.add_token(&format!("T{i}"), "a").unwrap();
    }
    assert_eq!(lexer.num_tokens(), lexsmith::MAX_TOKEN_TYPES);
    assert_eq!(
        lexer.add_token("OneTooMany", "a"),
        Err(LexError::CapacityExceeded {
            max: lexsmith::MAX_TOKEN_TYPES
        })
    );
    // The failed declaration changes nothing.
    assert_eq!(lexer.num_tokens(), lexsmith::MAX_TOKEN_TYPES);
}

#[test]
fn end_of_input_is_reported_exactly_once_per_call() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();

    let mut cursor = ByteCursor::new(&b"hi"[..]);
    let tok = lexer.process(&mut cursor).unwrap();
    assert_eq!(tok.lexeme, "hi");
    let eof = lexer.process(&mut cursor).unwrap();
    assert!(eof.is_eof());
    assert_eq!(eof.lexeme, "");
    // Further scans stay at EOF.
    assert!(lexer.process(&mut cursor).unwrap().is_eof());

    // An empty stream is EOF immediately.
    let mut empty = ByteCursor::new(&b""[..]);
    assert!(lexer.process(&mut empty).unwrap().is_eof());
    assert!(lexer.tokenize_str("", "empty").is_empty());
}

#[test]
fn error_token_consumes_the_unmatched_prefix() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();

    let mut cursor = ByteCursor::new(&b"9x"[..]);
    let bad = lexer.process(&mut cursor).unwrap();
    assert!(bad.is_error());
    assert_eq!(bad.lexeme, "9");
    // The scan can resume right after the failure.
    let next = lexer.process(&mut cursor).unwrap();
    assert_eq!(next.lexeme, "x");
}

#[test]
fn scanning_a_reader_matches_scanning_a_string() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();
    lexer.ignore_token("White", "[ \\n]+", "").unwrap();

    let src = "alpha beta\ngamma";
    let from_str = lexer.tokenize_str(src, "s");
    let from_reader = lexer
        .tokenize(std::io::Cursor::new(src.as_bytes()), "r")
        .unwrap();
    assert_eq!(from_str.tokens(), from_reader.tokens());
}

#[test]
fn token_stream_supports_random_access() {
    let mut lexer = Lexer::new();
    lexer.add_token("Word", "[a-z]+").unwrap();
    lexer.ignore_token("White", " +", "").unwrap();

    let stream = lexer.tokenize_str("a b c", "idx");
    assert_eq!(stream.len(), 3);
    assert_eq!(stream[0].lexeme, "a");
    assert_eq!(stream.get(2).map(|t| t.lexeme.as_str()), Some("c"));
    assert_eq!(stream.get(3), None);
    let reversed: Vec<&str> = stream.iter().rev().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(reversed, vec!["c", "b", "a"]);
}

#[test]
fn quoted_patterns_express_multibyte_operators() {
    let mut lexer = Lexer::new();
    let le = lexer.add_token("Le", "\"<=\"").unwrap();
    let lt = lexer.add_token("Lt", "<").unwrap();
    let tokens = ids_and_lexemes(&mut lexer, "<=<");
    assert_eq!(
        tokens,
        vec![(le, "<=".to_owned()), (lt, "<".to_owned())]
    );
}
