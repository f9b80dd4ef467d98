//! Big5 / CP950 encoding utilities for Traditional Chinese printers
//!
//! The receipt printer firmware only understands Big5. Sending UTF-8 does not
//! fail, it prints garbage, so text is always converted explicitly.
//!
//! The Windows device tools (`mode`, `copy`) write their diagnostics in the
//! console code page (CP950 on the target machines), which must be decoded
//! before it is logged.

use encoding_rs::{BIG5, EncoderResult, Encoding};

/// Code page used by the device subsystem for diagnostic output
#[cfg(windows)]
pub fn subsystem_code_page() -> &'static Encoding {
    BIG5
}

/// Code page used by the device subsystem for diagnostic output
#[cfg(not(windows))]
pub fn subsystem_code_page() -> &'static Encoding {
    encoding_rs::UTF_8
}

/// Byte emitted for characters Big5 cannot represent
const UNMAPPABLE: u8 = b'?';

/// Encode a string into Big5 bytes
///
/// Characters outside Big5 are replaced with `?` instead of the HTML numeric
/// references `encoding_rs` would produce by default.
pub fn encode_big5(s: &str) -> Vec<u8> {
    let mut encoder = BIG5.new_encoder();
    let mut out = Vec::with_capacity(s.len() * 2);
    let mut src = s;

    loop {
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(src.len())
            .unwrap_or(src.len() * 2 + 16);
        out.reserve(needed);

        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(src, &mut out, true);
        src = &src[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => out.push(UNMAPPABLE),
        }
    }

    out
}

/// Decode subprocess diagnostics with the subsystem code page
///
/// Output is trimmed so it can be placed on a single log line.
pub fn decode_diagnostics(bytes: &[u8]) -> String {
    let (text, _, _) = subsystem_code_page().decode(bytes);
    text.trim().to_string()
}
