//! QR decoding boundary.
//!
//! The dispatcher only needs `decode(image bytes) -> Option<text>`. The
//! decoder is injected through [`crate::telegram::HandlerDeps`] so tests
//! can substitute a canned fake without touching image data.

use std::sync::Arc;

pub trait QrDecoder: Send + Sync {
    /// Returns the payload of the first readable QR code in the image,
    /// or `None` when nothing decodes.
    fn decode(&self, image: &[u8]) -> Option<String>;
}

pub type SharedQrDecoder = Arc<dyn QrDecoder>;

/// Production decoder backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &[u8]) -> Option<String> {
        let luma = image::load_from_memory(image).ok()?.to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare(luma);
        for grid in prepared.detect_grids() {
            if let Ok((_, content)) = grid.decode() {
                return Some(content);
            }
        }
        None
    }
}
