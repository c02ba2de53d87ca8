// src/bin/gen_lex_tables.rs
// Build lexer tables from a token declaration file and write them to disk
// as both JSON and compact binary.
//
// Declaration file format, one token type per line, earlier lines have
// priority on equal-length ties:
//   Ident    [a-zA-Z_]\w*
//   Int      [0-9]+
//   -White   [ \t\n\r]+       <- leading '-' marks an ignored type
//   # comment lines and blank lines are skipped

use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use lexsmith::{
    Lexer, Tables,
    tables::{save_tables_bin, save_tables_json},
};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(decl_path) = args.next().map(PathBuf::from) else {
        bail!("usage: gen_lex_tables <decl-file> [out-stem]");
    };
    let out_stem = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tables/lexer_tables"));

    let text = fs::read_to_string(&decl_path)
        .with_context(|| format!("reading {}", decl_path.display()))?;

    let mut lexer = Lexer::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, pattern)) = line.split_once(char::is_whitespace) else {
            bail!("{}:{}: expected `name pattern`", decl_path.display(), lineno + 1);
        };
        let pattern = pattern.trim();
        let id = if let Some(name) = name.strip_prefix('-') {
            lexer.ignore_token(name, pattern, "")
        } else {
            lexer.add_token(name, pattern)
        }
        .with_context(|| format!("{}:{}", decl_path.display(), lineno + 1))?;
        println!("[gen_lex_tables] {name} -> id {id}");
    }

    let tables = Tables::from(lexer.dfa());
    println!(
        "[gen_lex_tables] {} token types, {} DFA states",
        lexer.num_tokens(),
        tables.n_states
    );

    if let Some(dir) = out_stem.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let json_path = out_stem.with_extension("json");
    save_tables_json(&json_path, &tables)
        .with_context(|| format!("writing {}", json_path.display()))?;
    println!("[gen_lex_tables] wrote {}", json_path.display());

    let bin_path = out_stem.with_extension("bin");
    save_tables_bin(&bin_path, &tables)
        .with_context(|| format!("writing {}", bin_path.display()))?;
    println!("[gen_lex_tables] wrote {}", bin_path.display());

    Ok(())
}
