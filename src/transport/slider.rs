use std::time::Duration;

/// Seek bar state. Values are positions within the current media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeekSlider {
    value: Duration,
    max: Duration,
    dragging: bool,
}

impl SeekSlider {
    pub fn value(&self) -> Duration {
        self.value
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// True while the user holds the slider.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Fill ratio for rendering, `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.max.is_zero() {
            0.0
        } else {
            (self.value.as_secs_f64() / self.max.as_secs_f64()).clamp(0.0, 1.0)
        }
    }

    /// Position corresponding to a fill ratio.
    pub fn value_at(&self, ratio: f64) -> Duration {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        Duration::from_secs_f64(self.max.as_secs_f64() * ratio)
    }

    pub(super) fn set_value(&mut self, value: Duration) {
        self.value = value.min(self.max);
    }

    pub(super) fn set_max(&mut self, max: Duration) {
        self.max = max;
        self.value = self.value.min(max);
    }

    pub(super) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Volume bar state, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSlider {
    value: u8,
}

impl VolumeSlider {
    pub fn new(value: u8) -> Self {
        Self {
            value: value.min(100),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.value) / 100.0
    }

    pub(super) fn set(&mut self, value: u8) {
        self.value = value.min(100);
    }
}
