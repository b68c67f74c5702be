//! String escaping for wire output.
//!
//! The store compares encoded items byte-for-byte across client
//! implementations, so the escaping here must match the law exactly:
//! quote and backslash get backslash escapes, newline and carriage return
//! get short escapes, every other control byte plus `<`, `>` and `&` gets
//! a `\u00XX` hex escape, and invalid UTF-8 sequences are replaced with
//! `�`. This is the strict HTML-safe variant of JSON string escaping,
//! not the relaxed default.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Returns `true` if an ASCII byte can be copied to the output verbatim.
fn is_plain(b: u8) -> bool {
    b >= 0x20 && b != b'\\' && b != b'"' && b != b'<' && b != b'>' && b != b'&'
}

/// Escape a string slice into `out` (without surrounding quotes).
pub fn escape_str_into(s: &str, out: &mut String) {
    let bytes = s.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b >= 0x80 || is_plain(b) {
            i += 1;
            continue;
        }
        out.push_str(&s[start..i]);
        push_escaped(b, out);
        i += 1;
        start = i;
    }
    out.push_str(&s[start..]);
}

/// Escape raw bytes into `out`, replacing invalid UTF-8 sequences with
/// the `�` escape.
pub fn escape_into(bytes: &[u8], out: &mut String) {
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                escape_str_into(valid, out);
                return;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                // The prefix was just validated by `from_utf8`.
                escape_str_into(
                    std::str::from_utf8(valid).expect("prefix validated"),
                    out,
                );
                out.push_str("\\ufffd");
                let skip = err.error_len().unwrap_or(after.len());
                rest = &after[skip..];
            }
        }
    }
}

fn push_escaped(b: u8, out: &mut String) {
    match b {
        b'\\' | b'"' => {
            out.push('\\');
            out.push(char::from(b));
        }
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        _ => {
            out.push_str("\\u00");
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0xF)]));
        }
    }
}
