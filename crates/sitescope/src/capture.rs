//! AI render requests built on frame capture.
//!
//! The preview captures a clean frame (see
//! [`capture_frame`](sitescope_render::capture_frame)), builds a prompt,
//! and hands both to an [`ImageGenerator`]. Either outcome is terminal for
//! that request; the caller decides whether to retry.

use serde::{Deserialize, Serialize};
use sitescope_render::CapturedFrame;

use crate::overlays::Lighting;
use crate::solar::format_hours;

/// Response of the image-generation source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderOutcome {
    Success {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    Error {
        error: String,
    },
}

impl RenderOutcome {
    /// Returns true for a successful render.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// The external image-generation call.
pub trait ImageGenerator {
    /// Generates an image from a PNG frame and a prompt.
    fn generate(&mut self, frame_png: &[u8], prompt: &str) -> RenderOutcome;
}

impl<F> ImageGenerator for F
where
    F: FnMut(&[u8], &str) -> RenderOutcome,
{
    fn generate(&mut self, frame_png: &[u8], prompt: &str) -> RenderOutcome {
        self(frame_png, prompt)
    }
}

/// Visual style requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    #[default]
    Photorealistic,
    Architectural,
    Watercolor,
    Sketch,
}

impl StylePreset {
    fn description(self) -> &'static str {
        match self {
            Self::Photorealistic => {
                "a photorealistic aerial photograph of this urban site, natural materials and vegetation"
            }
            Self::Architectural => {
                "a clean architectural visualization of this urban site, soft global illumination"
            }
            Self::Watercolor => "a loose watercolor illustration of this urban site",
            Self::Sketch => "a hand-drawn pencil sketch of this urban site",
        }
    }
}

/// Prompt text for a render request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPrompt {
    pub style: StylePreset,
    /// Free-form user addition.
    pub note: Option<String>,
}

impl RenderPrompt {
    /// Creates a prompt for a style preset.
    pub fn new(style: StylePreset) -> Self {
        Self { style, note: None }
    }

    /// Adds a user note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builds the prompt text, describing the lighting of the captured frame.
    pub fn text(&self, time_of_day: f32, lighting: &Lighting) -> String {
        let mut text = format!(
            "Render {}. Keep the exact geometry, massing and camera angle of the input image.",
            self.style.description()
        );
        match lighting.sun {
            Some(sun) => {
                let light = if sun.altitude > 0.1 {
                    "direct sunlight with crisp shadows"
                } else if sun.altitude >= -0.1 {
                    "low warm twilight light"
                } else {
                    "night lighting with illuminated windows and street lights"
                };
                text.push_str(&format!(
                    " Time of day {}, {light}, sun {:.0}° above the horizon.",
                    format_hours(f64::from(time_of_day)),
                    sun.altitude.to_degrees()
                ));
            }
            None => text.push_str(" Soft daylight under a clear blue sky."),
        }
        if let Some(note) = self.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            text.push(' ');
            text.push_str(note);
        }
        text
    }
}

/// Before/after pair for interactive comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderComparison {
    pub before: CapturedFrame,
    pub after_url: String,
    divider: f32,
}

impl RenderComparison {
    /// Creates a comparison with the divider centered.
    pub fn new(before: CapturedFrame, after_url: impl Into<String>) -> Self {
        Self {
            before,
            after_url: after_url.into(),
            divider: 0.5,
        }
    }

    /// Divider position in `[0, 1]` from the left edge.
    pub fn divider(&self) -> f32 {
        self.divider
    }

    /// Moves the divider, clamped to the frame.
    pub fn set_divider(&mut self, position: f32) {
        self.divider = if position.is_nan() {
            0.5
        } else {
            position.clamp(0.0, 1.0)
        };
    }
}

/// Result of one render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub frame: CapturedFrame,
    pub prompt: String,
    pub outcome: RenderOutcome,
}

impl RenderReport {
    /// Before/after comparison, if the render succeeded.
    pub fn comparison(&self) -> Option<RenderComparison> {
        match &self.outcome {
            RenderOutcome::Success { image_url } => {
                Some(RenderComparison::new(self.frame.clone(), image_url.clone()))
            }
            RenderOutcome::Error { .. } => None,
        }
    }
}
