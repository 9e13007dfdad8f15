//! Image fetch/decode helpers for project cards.
//!
//! Cards render a built-in placeholder until the real asset is confirmed
//! decodable, then swap. A failed fetch or decode leaves the placeholder in
//! place; the grid reveal never waits on a broken asset.

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Placeholder dimensions match the 4:3 card image slot.
const PLACEHOLDER_WIDTH: usize = 64;
const PLACEHOLDER_HEIGHT: usize = 48;
/// Neutral grey, opaque.
const PLACEHOLDER_RGBA: [u8; 4] = [0x3a, 0x3f, 0x47, 0xff];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("failed to fetch image: status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded RGBA image ready for upload to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Decodes raw bytes to confirm the asset is loadable and to hand the
/// renderer an RGBA buffer.
pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgba = decoded.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

/// The stand-in image shown until a card's real asset is confirmed.
pub fn placeholder() -> PreviewImage {
    let mut rgba = Vec::with_capacity(PLACEHOLDER_WIDTH * PLACEHOLDER_HEIGHT * 4);
    for _ in 0..PLACEHOLDER_WIDTH * PLACEHOLDER_HEIGHT {
        rgba.extend_from_slice(&PLACEHOLDER_RGBA);
    }
    PreviewImage {
        width: PLACEHOLDER_WIDTH,
        height: PLACEHOLDER_HEIGHT,
        rgba,
    }
}

/// Fetches and decodes one project image.
pub async fn fetch_preview(http: &reqwest::Client, url: &Url) -> Result<PreviewImage, ImageError> {
    let response = http.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Status(status));
    }
    let bytes = response.bytes().await?;
    decode_preview(&bytes)
}

/// Preload semantics from the legacy script: resolve even on error so the
/// flow continues, log which project's image stayed on the placeholder.
pub async fn preload_or_placeholder(
    http: &reqwest::Client,
    project_title: &str,
    url: &Url,
) -> PreviewImage {
    match fetch_preview(http, url).await {
        Ok(image) => image,
        Err(err) => {
            warn!("image for {project_title} could not be loaded: {err}");
            placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        buffer
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode test png");
        out.into_inner()
    }

    #[test]
    fn decodes_valid_png_bytes() {
        let preview = decode_preview(&png_bytes(5, 4)).expect("decode");
        assert_eq!(preview.width, 5);
        assert_eq!(preview.height, 4);
        assert_eq!(preview.rgba.len(), 5 * 4 * 4);
    }

    #[test]
    fn rejects_undecodable_bytes() {
        assert!(matches!(
            decode_preview(b"definitely not an image"),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn placeholder_is_an_opaque_rgba_buffer() {
        let placeholder = placeholder();
        assert_eq!(
            placeholder.rgba.len(),
            placeholder.width * placeholder.height * 4
        );
        assert!(placeholder.rgba.chunks(4).all(|px| px[3] == 0xff));
    }

    #[tokio::test]
    async fn preload_resolves_with_the_placeholder_on_fetch_failure() {
        // Bind and drop a listener so the port actively refuses.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/images/project1.jpg")).expect("dead url");
        let preview =
            preload_or_placeholder(&reqwest::Client::new(), "Personal Blog", &url).await;
        assert_eq!(preview, placeholder());
    }
}
