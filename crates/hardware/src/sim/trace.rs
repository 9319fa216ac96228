//! Access trace format.
//!
//! A trace is plain text, one operation per line:
//!
//! ```text
//! # comment
//! F <addr>                  instruction fetch
//! L <addr>                  data load
//! S <addr> <word>           data store
//! B <pc> <target> <taken>   resolved conditional branch
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hexadecimal. `taken` accepts `1`/`0`,
//! `T`/`N`, or `taken`/`not-taken`. Blank lines and text after `#` are ignored.

use std::fmt;
use std::str::SplitWhitespace;

use crate::common::TraceError;

/// One trace operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    /// Instruction fetch.
    Fetch {
        /// Byte address.
        addr: u32,
    },
    /// Data load.
    Load {
        /// Byte address.
        addr: u32,
    },
    /// Data store.
    Store {
        /// Byte address.
        addr: u32,
        /// Word written.
        value: u32,
    },
    /// Conditional branch with its resolved outcome.
    Branch {
        /// Branch address.
        pc: u32,
        /// Taken target.
        target: u32,
        /// Resolved direction.
        taken: bool,
    },
}

impl fmt::Display for TraceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fetch { addr } => write!(f, "F {addr:#x}"),
            Self::Load { addr } => write!(f, "L {addr:#x}"),
            Self::Store { addr, value } => write!(f, "S {addr:#x} {value:#x}"),
            Self::Branch { pc, target, taken } => {
                write!(f, "B {pc:#x} {target:#x} {}", u8::from(taken))
            }
        }
    }
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    let mut ops = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        if let Some(op) = parse_line(raw, i + 1)? {
            ops.push(op);
        }
    }
    Ok(ops)
}

/// Parses one line; `Ok(None)` for blank and comment-only lines.
///
/// # Errors
///
/// [`TraceError`] naming `line` when the line is malformed.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<TraceOp>, TraceError> {
    let body = raw.split('#').next().unwrap_or_default();
    let mut tokens = body.split_whitespace();
    let Some(op) = tokens.next() else {
        return Ok(None);
    };

    let parsed = match op {
        "F" | "f" => TraceOp::Fetch {
            addr: number(&mut tokens, line, "address")?,
        },
        "L" | "l" => TraceOp::Load {
            addr: number(&mut tokens, line, "address")?,
        },
        "S" | "s" => TraceOp::Store {
            addr: number(&mut tokens, line, "address")?,
            value: number(&mut tokens, line, "store word")?,
        },
        "B" | "b" => TraceOp::Branch {
            pc: number(&mut tokens, line, "pc")?,
            target: number(&mut tokens, line, "target")?,
            taken: direction(&mut tokens, line)?,
        },
        other => {
            return Err(TraceError::UnknownOp {
                line,
                op: other.to_string(),
            });
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(TraceError::TrailingInput {
            line,
            text: extra.to_string(),
        });
    }
    Ok(Some(parsed))
}

fn number(
    tokens: &mut SplitWhitespace<'_>,
    line: usize,
    field: &'static str,
) -> Result<u32, TraceError> {
    let text = tokens
        .next()
        .ok_or(TraceError::MissingField { line, field })?;
    let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    value.map_err(|_| TraceError::BadOperand {
        line,
        field,
        text: text.to_string(),
    })
}

fn direction(tokens: &mut SplitWhitespace<'_>, line: usize) -> Result<bool, TraceError> {
    let field = "taken";
    let text = tokens
        .next()
        .ok_or(TraceError::MissingField { line, field })?;
    match text.to_ascii_lowercase().as_str() {
        "1" | "t" | "taken" => Ok(true),
        "0" | "n" | "not-taken" => Ok(false),
        _ => Err(TraceError::BadOperand {
            line,
            field,
            text: text.to_string(),
        }),
    }
}
