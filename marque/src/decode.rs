//! Image decoding for uploaded pictures.
//!
//! Fulfils the core's decode contract with the `image` crate. Decoding may
//! run on a worker thread; the host applies the one-shot result through a
//! single `Editor::add_image` call, so the insertion is atomic as far as the
//! editor is concerned.

use marque_core::render::{DecodeError, DecodedImage};
use marque_core::state::scene::ImageSource;

pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(|err| match err {
        image::ImageError::Unsupported(_) => DecodeError::Unsupported,
        _ => DecodeError::Malformed,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(DecodedImage {
        source: ImageSource::new(bytes.to_vec()),
        width,
        height,
        pixels: rgba.into_raw().into(),
    })
}

/// Decode on a worker thread. The receiver yields exactly one result; there
/// is no cancellation - a decode that finishes after the user moved on still
/// applies when the host delivers it.
pub fn decode_in_background(
    bytes: Vec<u8>,
) -> crossbeam::channel::Receiver<Result<DecodedImage, DecodeError>> {
    let (send, recv) = crossbeam::channel::bounded(1);
    std::thread::spawn(move || {
        let result = decode_bytes(&bytes);
        // The host may have shut down; nothing to do then.
        let _ = send.send(result);
    });
    recv
}

#[cfg(test)]
mod test {
    use super::{decode_bytes, decode_in_background};
    use marque_core::render::{DecodeError, RasterImage};

    fn tiny_png() -> Vec<u8> {
        marque_core::export::to_png(&RasterImage {
            width: 3,
            height: 2,
            pixels: vec![128; 24],
        })
        .unwrap()
    }

    #[test]
    fn decodes_png() {
        let img = decode_bytes(&tiny_png()).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.source.bytes(), tiny_png());
    }
    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            decode_bytes(b"definitely not an image").unwrap_err(),
            DecodeError::Malformed
        );
    }
    #[test]
    fn background_decode_delivers_once() {
        let recv = decode_in_background(tiny_png());
        let img = recv.recv().unwrap().unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert!(recv.recv().is_err());
    }
}
