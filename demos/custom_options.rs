//! Customizing tokens and recovery with the parser builder.
//!
//! Run with: cargo run --example custom_options

use ltsv_stream::{LtsvParser, ParserOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Pipe-separated, `=` between key and value, backtick quotes
    let parser = LtsvParser::builder()
        .with_entry_delimiter('|')
        .with_kv_delimiter('=')
        .with_quote_char('`')
        .build();

    let record = parser
        .parse_str("name=`Smith|John`|age=42|note=a\\|b")
        .next()
        .ok_or("no record")??;
    println!("Pipe delimiter: {}", serde_json::to_string(&record)?);

    // Lenient mode recovers instead of failing
    println!("\nLenient recovery:");
    let lenient = LtsvParser::builder().lenient().trim_keys().trim_values().build();
    for record in lenient.parse_str(" abc : 1 \tdef\t:hij\tklm\n:orphan\n") {
        println!("{}", serde_json::to_string(&record?)?);
    }

    // Options can come from a configuration document
    println!("\nFrom JSON config:");
    let options: ParserOptions =
        serde_json::from_str(r#"{ "line_ending": ";", "skip_null_values": true }"#)?;
    let configured = LtsvParser::with_options(options);
    for record in configured.parse_str("a:1\tb:;c:3;") {
        println!("{}", serde_json::to_string(&record?)?);
    }

    Ok(())
}
