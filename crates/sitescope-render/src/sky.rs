//! Sky background gradients.

use glam::Vec3;
use sitescope_core::color::hex;

/// Phase of the sky for a given solar altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyPhase {
    Day,
    Dusk,
    Night,
}

impl SkyPhase {
    /// Day above `+threshold`, night below `-threshold`, dusk in between.
    pub fn from_altitude(altitude: f64, threshold: f64) -> Self {
        if altitude > threshold {
            Self::Day
        } else if altitude < -threshold {
            Self::Night
        } else {
            Self::Dusk
        }
    }
}

/// Vertical background gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub top: Vec3,
    pub bottom: Vec3,
}

impl SkyGradient {
    /// Fixed blue used when the sun study is off.
    pub fn default_blue() -> Self {
        Self {
            top: hex(0x87b5e5),
            bottom: hex(0xdfeaf5),
        }
    }

    /// Gradient for a sky phase.
    pub fn for_phase(phase: SkyPhase) -> Self {
        match phase {
            SkyPhase::Day => Self {
                top: hex(0x4a90d9),
                bottom: hex(0xbfdcf5),
            },
            SkyPhase::Dusk => Self {
                top: hex(0x3b4a7a),
                bottom: hex(0xf2a65a),
            },
            SkyPhase::Night => Self {
                top: hex(0x0b1026),
                bottom: hex(0x1f2a4a),
            },
        }
    }

    /// Color at `t` in `[0, 1]` from bottom to top.
    pub fn sample(&self, t: f32) -> Vec3 {
        self.bottom.lerp(self.top, t.clamp(0.0, 1.0))
    }
}
