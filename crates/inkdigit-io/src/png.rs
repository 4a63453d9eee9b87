//! PNG format support for diagnostic images

use crate::diagnostic::DiagnosticImage;
use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG as an 8-bit grayscale diagnostic image
///
/// Color images are reduced to luminance; an alpha channel is composited
/// over white so transparent canvas pixels read as paper.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<DiagnosticImage> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let channels = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::Eight) => 1,
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => 2,
        (ColorType::Rgb, BitDepth::Eight) => 3,
        (ColorType::Rgba, BitDepth::Eight) => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG format: {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));

    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..(y + 1) * bytes_per_row];
        for px in row.chunks_exact(channels).take(width as usize) {
            let (luma, alpha) = match channels {
                1 => (px[0] as f32, 255.0),
                2 => (px[0] as f32, px[1] as f32),
                3 => (luminance(px[0], px[1], px[2]), 255.0),
                _ => (luminance(px[0], px[1], px[2]), px[3] as f32),
            };
            let a = alpha / 255.0;
            pixels.push((luma * a + 255.0 * (1.0 - a)).round() as u8);
        }
    }

    DiagnosticImage::from_pixels(width, height, pixels)
}

/// Write a diagnostic image as 8-bit grayscale PNG
pub fn write_png<W: Write>(image: &DiagnosticImage, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(image.pixels())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

/// Encode a diagnostic image to an in-memory PNG
pub fn encode_png(image: &DiagnosticImage) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    write_png(image, &mut out)?;
    Ok(out)
}

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_png_roundtrip() {
        let img = DiagnosticImage::from_pixels(3, 2, vec![0, 64, 128, 192, 255, 10]).unwrap();
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let back = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_read_rgba_composites_over_white() {
        let mut bytes = Vec::new();
        {
            let mut encoder = Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut w = encoder.write_header().unwrap();
            // opaque black, fully transparent black
            w.write_image_data(&[0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
            w.finish().unwrap();
        }
        let img = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(img.pixels(), &[0, 255]);
    }
}
