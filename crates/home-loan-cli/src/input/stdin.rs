use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a loan description piped on stdin straight into the
/// command's input type. Returns None when stdin is a TTY or carries
/// nothing, so the flags apply instead.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| format!("Failed to parse JSON from stdin: {}", e).into())
}
