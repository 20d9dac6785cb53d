//! Line codec for the durable mapping file.
//!
//! Each mapping is stored as `<short key>:<original url>` on its own line.
//! Keys contain colons themselves (`http://short.ly/1`), and every stored
//! URL starts with `http://` or `https://`, so the separator is the first `:`
//! directly followed by one of those schemes. Everything after the separator
//! is the URL, colons included.

use quicklink_core::{MappingEntry, ShortKey};

pub const SEPARATOR: char = ':';

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Serializes one entry, without the trailing newline.
pub fn encode_line(entry: &MappingEntry) -> String {
    format!("{}{}{}", entry.short_key, SEPARATOR, entry.original_url)
}

/// Serializes every entry, one per line, in the given order.
pub fn encode<'a>(entries: impl IntoIterator<Item = &'a MappingEntry>) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&encode_line(entry));
        out.push('\n');
    }
    out
}

/// Finds the byte offset of the key/URL separator in `line`.
fn find_separator(line: &str) -> Option<usize> {
    line.match_indices(SEPARATOR).map(|(at, _)| at).find(|&at| {
        let rest = &line[at + SEPARATOR.len_utf8()..];
        URL_SCHEMES.iter().any(|scheme| rest.starts_with(scheme))
    })
}

/// Parses one line of the durable file.
///
/// Returns `None` when no separator precedes an `http://` or `https://` URL,
/// or when the key is empty.
pub fn decode_line(line: &str) -> Option<MappingEntry> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let split_at = find_separator(line)?;
    let (key, url) = (&line[..split_at], &line[split_at + SEPARATOR.len_utf8()..]);

    let short_key = ShortKey::new(key).ok()?;
    Some(MappingEntry::new(short_key, url))
}
