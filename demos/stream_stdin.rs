//! Streaming LTSV from stdin to JSON lines on stdout.
//!
//! Run with: cat access.log | RUST_LOG=ltsv_stream=debug cargo run --example stream_stdin -- --lenient

use ltsv_stream::LtsvParser;
use std::error::Error;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let lenient = std::env::args().any(|arg| arg == "--lenient");
    let builder = LtsvParser::builder();
    let parser = if lenient { builder.lenient() } else { builder }.build();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in parser.parse_reader(io::stdin().lock()) {
        serde_json::to_writer(&mut out, &record?)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}
