//! Raster export: PNG bytes and the browser-style `data:` URL form.
//!
//! Pure functions of a [`RasterImage`]; the history stack is never involved.

use crate::render::RasterImage;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("png encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("raster buffer length does not match its dimensions")]
    MalformedRaster,
}

/// Encode as PNG (RGBA8, straight alpha).
pub fn to_png(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let expected = image.width as usize * image.height as usize * 4;
    if image.pixels.len() != expected {
        return Err(ExportError::MalformedRaster);
    }
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.pixels)?;
    writer.finish()?;
    Ok(out)
}

/// Encode as a `data:image/png;base64,...` URL, the shape a browser download
/// link wants.
pub fn to_data_url(image: &RasterImage) -> Result<String, ExportError> {
    use base64::Engine;
    let png = to_png(image)?;
    let mut url = String::from("data:image/png;base64,");
    base64::engine::general_purpose::STANDARD.encode_string(&png, &mut url);
    Ok(url)
}

#[cfg(test)]
mod test {
    use super::{to_data_url, to_png, ExportError};
    use crate::render::RasterImage;

    fn tiny() -> RasterImage {
        RasterImage {
            width: 2,
            height: 2,
            pixels: vec![255; 16],
        }
    }

    #[test]
    fn png_magic() {
        let bytes = to_png(&tiny()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
    #[test]
    fn data_url_prefix() {
        let url = to_data_url(&tiny()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }
    #[test]
    fn rejects_short_buffer() {
        let bad = RasterImage {
            width: 4,
            height: 4,
            pixels: vec![0; 8],
        };
        assert!(matches!(to_png(&bad), Err(ExportError::MalformedRaster)));
    }
}
