//! Parsing an LTSV access log with the default options.
//!
//! Run with: cargo run --example simple

use ltsv_stream::parse_str;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let log = "host:127.0.0.1\tmethod:GET\turi:/index.html\tstatus:200\n\
               host:127.0.0.2\tmethod:POST\turi:/login\tstatus:302\treferer:\n";

    for record in parse_str(log) {
        let record = record?;
        println!(
            "{} {} {} -> {}",
            record.get("host").unwrap_or("-"),
            record.get("method").unwrap_or("-"),
            record.get("uri").unwrap_or("-"),
            record.get("status").unwrap_or("-"),
        );
        if let Some(None) = record.get_entry(Some("referer")) {
            println!("  (referer present but empty)");
        }
    }

    // Strict mode reports where a line went wrong
    if let Some(Err(e)) = parse_str("host:a\tstatus\tsize:1").next() {
        println!("✗ {}", e);
    }

    Ok(())
}
