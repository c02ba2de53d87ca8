// src/main.rs
use lexsmith::Lexer;

fn main() -> anyhow::Result<()> {
    // A tiny expression-language rule set covering identifiers, numbers,
    // multi-char operators, and ignored whitespace/comments.
    let mut lexer = Lexer::new();
    lexer.add_token("Float", "[0-9]*\\.[0-9]+")?;
    lexer.add_token("Int", "[0-9]+")?;
    lexer.add_token("Ident", "[a-zA-Z_]\\w*")?;
    lexer.add_token("EqEq", "\"==\"")?;
    lexer.add_token("Assign", "=")?;
    lexer.add_token("Plus", "\\+")?;
    lexer.add_token("LParen", "\\(")?;
    lexer.add_token("RParen", "\\)")?;
    lexer.ignore_token("Comment", "\"//\".*", "line comment")?;
    lexer.ignore_token("White", "[ \\t\\n\\r]+", "whitespace")?;

    let src = r#"
        foo = 12 + bar(7) // hello
        baz == 3.5 + qux
    "#;

    let tokens = lexer.tokenize_str(src, "demo");
    println!("TOKENS:");
    for t in &tokens {
        println!("{:>3} {:<8} {:?}  (line {})", t.id, lexer.token_name(t.id), t.lexeme, t.line);
    }
    Ok(())
}
