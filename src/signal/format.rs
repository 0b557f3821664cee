//! Fixed-width rendering of signature vectors for raw_codes blocks.

/// Leading spaces used when no explicit indent is requested.
pub const DEFAULT_PREFIX_SPACES: usize = 2;

// 3 pulse/gap pairs per line, matching hand-written lircd.conf files.
const FIELDS_PER_LINE: usize = 6;
const FIELD_WIDTH: usize = 8;

/// Render a signature vector as a fixed-column text block.
///
/// Six integers per line, each right-justified to eight characters, every
/// line prefixed with `prefix_spaces` spaces. The last line holds whatever
/// remains, unpadded. Lines are joined with `\n` and carry no trailing
/// newline. Output is byte-identical for identical input.
pub fn format_raw_block(codes: &[u32], prefix_spaces: usize) -> String {
    codes
        .chunks(FIELDS_PER_LINE)
        .map(|chunk| {
            let mut line = " ".repeat(prefix_spaces);
            for code in chunk {
                line.push_str(&format!("{:>width$}", code, width = FIELD_WIDTH));
            }
            line
        })
        .collect::<Vec<String>>()
        .join("\n")
}
