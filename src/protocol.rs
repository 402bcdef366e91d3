//! ASCII line protocol spoken with the host PC.
//!
//! Requests are `{INDEX,R|W,VAL}` terminated by `\n`. A write is answered
//! with `OK`, a read with the decimal register value, a rejected request
//! with `ERR`; every response line ends in `\r\n`. `SEND_HT` appends a
//! `humidity,temperature` line after the `OK` (empty if no reading yet).

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{HOST_LINE_MAX, HOST_RESPONSE_MAX};
use crate::error::{Error, Result};
use crate::registers::{Access, Register, Reply, Request};

pub type Response = String<HOST_RESPONSE_MAX>;

pub const ACK: &str = "OK";
pub const NACK: &str = "ERR";
pub const EOL: &str = "\r\n";

pub fn parse_request(line: &[u8]) -> Result<Request> {
    let text = core::str::from_utf8(line).map_err(|_| Error::Frame)?.trim();
    let body = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or(Error::Frame)?;

    let mut fields = body.split(',').map(str::trim);
    let (Some(index), Some(access), Some(value), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::Frame);
    };

    let index: u16 = index.parse().map_err(|_| Error::Frame)?;
    let register = Register::from_index(index)?;
    let value: u16 = value.parse().map_err(|_| Error::Value)?;
    let access = match access {
        "R" | "r" => Access::Read,
        "W" | "w" => Access::Write(value),
        _ => return Err(Error::Access),
    };

    Ok(Request { register, access })
}

/// Render the bytes sent back for one request.
pub fn render(outcome: &Result<Reply>) -> Response {
    let mut out = Response::new();
    if write_reply(&mut out, outcome).is_err() {
        // reading too wide for the buffer
        out.clear();
        let _ = write!(out, "{NACK}{EOL}");
    }
    out
}

fn write_reply(out: &mut Response, outcome: &Result<Reply>) -> core::fmt::Result {
    match outcome {
        Ok(Reply::Ack) => write!(out, "{ACK}{EOL}"),
        Ok(Reply::AckWithMeasurement(Some(m))) => write!(
            out,
            "{ACK}{EOL}{:.2},{:.2}{EOL}",
            m.humidity, m.temperature
        ),
        Ok(Reply::AckWithMeasurement(None)) => write!(out, "{ACK}{EOL}{EOL}"),
        Ok(Reply::Value(v)) => write!(out, "{v}{EOL}"),
        Err(_) => write!(out, "{NACK}{EOL}"),
    }
}

/// Accumulates UART bytes into request lines.
///
/// A line longer than `HOST_LINE_MAX` is dropped up to its newline and
/// reported once as `Error::Overflow`.
pub struct LineBuffer {
    buf: Vec<u8, HOST_LINE_MAX>,
    overflowed: bool,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte; returns the parsed request once a line completes.
    /// Blank lines are skipped.
    pub fn push(&mut self, byte: u8) -> Option<Result<Request>> {
        if byte != b'\n' {
            if self.buf.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let res = if self.overflowed {
            Some(Err(Error::Overflow))
        } else if self.buf.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(parse_request(&self.buf))
        };
        self.buf.clear();
        self.overflowed = false;
        res
    }

    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
