//! PGM (binary P5) support
//!
//! Only 8-bit binary graymaps are handled; they are the raw-buffer form of
//! diagnostic images.

use crate::diagnostic::DiagnosticImage;
use crate::{IoError, IoResult};
use std::io::{BufRead, Read, Write};

/// Write a diagnostic image as binary PGM (P5, maxval 255)
pub fn write_pgm<W: Write>(image: &DiagnosticImage, mut writer: W) -> IoResult<()> {
    write!(writer, "P5\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.pixels())?;
    Ok(())
}

/// Read a binary PGM (P5) with maxval 255
pub fn read_pgm<R: BufRead>(mut reader: R) -> IoResult<DiagnosticImage> {
    let magic = next_token(&mut reader)?;
    if magic != "P5" {
        return Err(IoError::UnsupportedFormat(format!(
            "expected P5 graymap, found {magic:?}"
        )));
    }
    let width = parse_header_value(&next_token(&mut reader)?)?;
    let height = parse_header_value(&next_token(&mut reader)?)?;
    let maxval = parse_header_value(&next_token(&mut reader)?)?;
    if maxval != 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "only maxval 255 is supported, found {maxval}"
        )));
    }
    let mut pixels = vec![0u8; (width as usize) * (height as usize)];
    reader.read_exact(&mut pixels)?;
    DiagnosticImage::from_pixels(width, height, pixels)
}

/// Read one whitespace-delimited header token, skipping `#` comments.
/// Consumes exactly one trailing whitespace byte.
fn next_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        let c = byte[0];
        if c == b'#' && token.is_empty() {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if c.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            return Ok(token);
        }
        token.push(c as char);
    }
}

fn parse_header_value(token: &str) -> IoResult<u32> {
    token
        .parse()
        .map_err(|_| IoError::DecodeError(format!("invalid PGM header value {token:?}")))
}
