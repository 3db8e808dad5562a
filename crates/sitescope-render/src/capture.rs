//! Fixed-resolution frame capture.
//!
//! A capture renders the scene at a configured output size, independent of
//! the on-screen size, with overlay helpers hidden. The original size and
//! helper visibility are restored when the capture ends, whether it
//! succeeded or not.

use sitescope_core::{NodeId, Scene};

use crate::error::CaptureResult;
use crate::screenshot::{encode_png, PixelFormat};

/// Something that can render a [`Scene`] into pixels.
pub trait RenderSurface {
    /// Current render size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the render target and adjusts the camera aspect.
    fn set_size(&mut self, width: u32, height: u32);

    /// Renders visible nodes and reads back 8-bit pixels, rows top to bottom.
    fn render_pixels(&mut self, scene: &Scene) -> CaptureResult<Vec<u8>>;

    /// Channel order of [`render_pixels`](Self::render_pixels).
    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgba8
    }
}

/// A captured, PNG-encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Restores surface size and helper visibility on drop.
struct CaptureGuard<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    scene: &'a mut Scene,
    original_size: (u32, u32),
    hidden: Vec<NodeId>,
}

impl<'a, S: RenderSurface + ?Sized> CaptureGuard<'a, S> {
    fn begin(surface: &'a mut S, scene: &'a mut Scene, width: u32, height: u32) -> Self {
        let original_size = surface.size();
        let hidden: Vec<NodeId> = scene
            .iter()
            .filter(|(_, n)| n.visible && n.overlay().is_some_and(|k| k.is_capture_helper()))
            .map(|(id, _)| id)
            .collect();
        for id in &hidden {
            scene.set_visible(*id, false);
        }
        surface.set_size(width, height);
        Self {
            surface,
            scene,
            original_size,
            hidden,
        }
    }
}

impl<S: RenderSurface + ?Sized> Drop for CaptureGuard<'_, S> {
    fn drop(&mut self) {
        let (w, h) = self.original_size;
        self.surface.set_size(w, h);
        for id in &self.hidden {
            self.scene.set_visible(*id, true);
        }
    }
}

/// Renders `scene` at `width × height` and encodes the frame as PNG.
///
/// Solar-path and wind-field nodes are hidden for the duration of the
/// capture.
pub fn capture_frame<S: RenderSurface + ?Sized>(
    surface: &mut S,
    scene: &mut Scene,
    width: u32,
    height: u32,
) -> CaptureResult<CapturedFrame> {
    let guard = CaptureGuard::begin(surface, scene, width, height);
    log::debug!(
        "capturing {width}x{height} frame with {} helpers hidden",
        guard.hidden.len()
    );
    let pixels = guard.surface.render_pixels(&*guard.scene)?;
    let png = encode_png(&pixels, width, height, guard.surface.pixel_format())?;
    drop(guard);

    Ok(CapturedFrame { width, height, png })
}
