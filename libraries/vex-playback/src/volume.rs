//! Volume control with logarithmic scaling
//!
//! The player exposes a 0-100 level. The media element takes a linear
//! 0.0-1.0 volume, so the level is mapped through -60 dB..0 dB first.

/// Volume level with mute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: u8,
    muted: bool,
}

impl Volume {
    /// Create new volume at `level` (clamped to 100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Mute, keeping the level
    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear volume for the media element
    ///
    /// `10^((level - 100) * 0.6 / 20)`, with level 0 and mute mapped to
    /// silence.
    pub fn element_volume(&self) -> f32 {
        if self.muted || self.level == 0 {
            return 0.0;
        }
        let db = (f32::from(self.level) - 100.0) * 0.6;
        10.0_f32.powf(db / 20.0).clamp(0.0, 1.0)
    }

    /// Effective attenuation in dB, floored at -60
    pub fn to_db(&self) -> f32 {
        if self.muted || self.level == 0 {
            -60.0
        } else {
            (f32::from(self.level) - 100.0) * 0.6
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}
