//! Pure byte-to-hex-text formatting, shared by every payload handler and the
//! preface/proxy-protocol renderers.

/// Controls how [`hexdump`] lays bytes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexdumpMode {
    /// Group into rows of `row_size` bytes, rows joined with `\n`.
    MultiRow { row_size: usize },
    /// All bytes on a single space-separated row.
    SingleRow,
}

impl Default for HexdumpMode {
    fn default() -> Self {
        HexdumpMode::MultiRow { row_size: 16 }
    }
}

/// Render `bytes` as lowercase hex pairs separated by single spaces.
///
/// No index gutter, no printable column, no trailing newline. Empty input
/// always yields the empty string.
pub fn hexdump(bytes: &[u8], mode: HexdumpMode) -> String {
    match mode {
        HexdumpMode::SingleRow => hex_row(bytes),
        HexdumpMode::MultiRow { row_size } => {
            if bytes.is_empty() {
                return String::new();
            }
            bytes
                .chunks(row_size)
                .map(hex_row)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

fn hex_row(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indent every line of `text` by `prefix`, matching the Python reference's
/// `textwrap.indent` use for nesting a hexdump under a banner line.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
