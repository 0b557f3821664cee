//! lircd.conf document handling: the command table, the RAW_CODES config
//! writer, and the reader that re-loads commands from an existing file.
//!
//! Header field values follow http://www.lirc.org/html/lircd.conf.html and
//! are fixed constants except for the remote name.

use crate::signal::format_raw_block;
use anyhow::{Context, Result};
use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Relative error tolerance in percent.
const EPS: u32 = 30;
/// Absolute error tolerance in microseconds.
const AEPS: u32 = 100;
/// Trailing pulse width.
const PTRAIL: u32 = 0;
/// Long space after the trailing pulse.
const GAP: u32 = 28205;
/// Carrier frequency in Hz.
const FREQUENCY: u32 = 38000;

/// Indent used for command signature blocks in the generated file.
const COMMAND_PREFIX_SPACES: usize = 3;

/// Captured commands in insertion order: command name → signature vector.
///
/// Owned exclusively by the session orchestrator; completed signatures are
/// passed in, the core pipeline never holds a handle to this.
#[derive(Debug, Default)]
pub struct CommandTable {
    entries: Vec<(String, Vec<u32>)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Add a command, replacing any earlier signature under the same name.
    pub fn insert(&mut self, name: String, signature: Vec<u32>) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = signature;
        } else {
            self.entries.push((name, signature));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.entries
            .iter()
            .map(|(name, codes)| (name.as_str(), codes.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render the full `begin remote` .. `end remote` document.
pub fn render_config(remote: &str, table: &CommandTable) -> String {
    let mut out = String::new();
    out.push_str("begin remote\n");
    let _ = writeln!(out, "  name      {remote}");
    out.push_str("  flags     RAW_CODES\n");
    let _ = writeln!(out, "  eps       {EPS}");
    let _ = writeln!(out, "  aeps      {AEPS}");
    let _ = writeln!(out, "  ptrail    {PTRAIL}");
    out.push_str("  repeat    0 0\n");
    let _ = writeln!(out, "  gap       {GAP}");
    let _ = writeln!(out, "  frequency {FREQUENCY}");
    out.push('\n');
    out.push_str("  begin raw_codes\n\n");

    for (name, codes) in table.iter() {
        let _ = writeln!(out, "   name {name}");
        out.push_str(&format_raw_block(codes, COMMAND_PREFIX_SPACES));
        out.push_str("\n\n");
    }

    out.push_str("  end raw_codes\n\n");
    out.push_str("end remote\n");
    out
}

pub fn write_config(path: &Path, remote: &str, table: &CommandTable) -> Result<()> {
    fs::write(path, render_config(remote, table))
        .with_context(|| format!("failed to write config file '{}'", path.display()))
}

/// Re-load commands from an existing config so a session can extend it.
///
/// Only the `begin raw_codes` section is scanned, so the remote's own
/// `name` header line is never misread as a command. Within the section a
/// `name` line opens a command, numeric lines accumulate its codes, and a
/// blank line (or the section end) commits it.
pub fn parse_existing_config(text: &str) -> CommandTable {
    let code_re = Regex::new(r"\d+").expect("static regex");
    let mut table = CommandTable::new();
    let mut current: Option<(String, Vec<u32>)> = None;
    let mut in_raw_codes = false;

    for line in text.lines() {
        let line = line.trim();
        if !in_raw_codes {
            in_raw_codes = line.starts_with("begin raw_codes");
            continue;
        }
        if line.starts_with("end raw_codes") {
            break;
        }
        if let Some(rest) = line.strip_prefix("name") {
            if let Some((name, codes)) = current.take() {
                table.insert(name, codes);
            }
            if let Some(name) = rest.split_whitespace().last() {
                current = Some((name.to_string(), Vec::new()));
            }
        } else if line.is_empty() {
            if let Some((name, codes)) = current.take() {
                table.insert(name, codes);
            }
        } else if let Some((_, codes)) = current.as_mut() {
            codes.extend(
                code_re
                    .find_iter(line)
                    .filter_map(|m| m.as_str().parse::<u32>().ok()),
            );
        }
    }
    if let Some((name, codes)) = current.take() {
        table.insert(name, codes);
    }
    table
}

/// Read and re-parse an existing config file.
pub fn load_config(path: &Path) -> Result<CommandTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    Ok(parse_existing_config(&text))
}
