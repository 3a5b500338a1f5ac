//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Command line tool to build, inspect and answer envelopes."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use courier_envelope::Envelope;

/// Read and decode a wire envelope from `path`, or stdin when `path` is `-`.
pub fn read_envelope(path: &Path) -> Result<Envelope> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("unable to read envelope from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("unable to read envelope file {}", path.display()))?
    };
    courier_json::from_json(raw.trim())
        .with_context(|| format!("{} is not a valid envelope", path.display()))
}

/// Parse a `KEY=VALUE` header flag.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("header '{raw}' has an empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Print `envelope` as wire JSON on stdout.
pub fn print_envelope(envelope: &Envelope, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        courier_json::to_json_pretty(envelope)?
    } else {
        courier_json::to_json(envelope)?
    };
    println!("{rendered}");
    Ok(())
}
