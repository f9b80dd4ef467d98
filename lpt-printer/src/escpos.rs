//! ESC/POS command encoding
//!
//! Translates an abstract [`PrintInstruction`] into the raw bytes the printer
//! consumes. Encoding is pure and total: every instruction produces bytes.

use crate::encoding::encode_big5;

/// GS V 0 - Full cut
pub const FULL_CUT: [u8; 3] = [0x1D, 0x56, 0x00];

/// Line feed
pub const LF: u8 = 0x0A;

/// Maximum text length (in characters) accepted for a single line
pub const MAX_TEXT_CHARS: usize = 1000;

/// Feed line count bounds
pub const MIN_FEED_LINES: u32 = 1;
pub const MAX_FEED_LINES: u32 = 50;

/// Line terminator appended after printed text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Terminator {
    #[default]
    Lf,
    CrLf,
}

impl Terminator {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Terminator::Lf => b"\n",
            Terminator::CrLf => b"\r\n",
        }
    }
}

/// A single print instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintInstruction {
    /// Print one line of text
    Text {
        content: String,
        terminator: Terminator,
    },
    /// Advance the paper by `lines` lines
    Feed { lines: u32 },
    /// Full paper cut
    Cut,
}

impl PrintInstruction {
    /// Text line terminated with LF
    pub fn text(content: impl Into<String>) -> Self {
        PrintInstruction::Text {
            content: content.into(),
            terminator: Terminator::Lf,
        }
    }

    pub fn feed(lines: u32) -> Self {
        PrintInstruction::Feed { lines }
    }

    /// Wire name of the instruction kind (`printLine`, `newline`, `cut`)
    pub fn kind(&self) -> &'static str {
        match self {
            PrintInstruction::Text { .. } => "printLine",
            PrintInstruction::Feed { .. } => "newline",
            PrintInstruction::Cut => "cut",
        }
    }
}

/// Clamp a feed count into the range the printer accepts
pub fn clamp_feed(lines: u32) -> u32 {
    lines.clamp(MIN_FEED_LINES, MAX_FEED_LINES)
}

/// Encode an instruction into printer bytes
pub fn encode(instruction: &PrintInstruction) -> Vec<u8> {
    match instruction {
        PrintInstruction::Text {
            content,
            terminator,
        } => {
            let mut buf = encode_big5(content);
            buf.extend_from_slice(terminator.as_bytes());
            buf
        }
        PrintInstruction::Feed { lines } => vec![LF; clamp_feed(*lines) as usize],
        PrintInstruction::Cut => FULL_CUT.to_vec(),
    }
}
