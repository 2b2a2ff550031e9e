//! Provider-neutral synthesis parameters and their per-provider scales.
//!
//! The unified scale uses dimensionless multipliers in `[0.5, 2.0]` for speaking rate and
//! style intensity (`1.0` is unmodified) and a percentage in `[0.0, 100.0]` for volume.
//! Conversions into a provider's native scale are total and clamp at both ends.

pub const MIN_RATIO: f64 = 0.5;
pub const MAX_RATIO: f64 = 2.0;
pub const MIN_VOLUME: f64 = 0.0;
pub const MAX_VOLUME: f64 = 100.0;
/// Lowest style degree the standard engine accepts
pub const MIN_STYLE_DEGREE: f64 = 0.01;

/// Clamp into `[lo, hi]`, mapping NaN to `fallback`
fn clamp_finite(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(lo, hi)
}

/// Synthesis parameters on the unified scale
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisParameters {
    rate: f64,
    volume: f64,
    style_intensity: f64,
    style: String,
    voice_id: String,
}

impl SynthesisParameters {
    /// Identity prosody for the given voice and expressive style
    pub fn new(voice_id: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            rate: 1.0,
            volume: MAX_VOLUME,
            style_intensity: 1.0,
            style: style.into(),
            voice_id: voice_id.into(),
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = clamp_finite(rate, MIN_RATIO, MAX_RATIO, 1.0);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = clamp_finite(volume, MIN_VOLUME, MAX_VOLUME, MAX_VOLUME);
        self
    }

    pub fn with_style_intensity(mut self, intensity: f64) -> Self {
        self.style_intensity = clamp_finite(intensity, MIN_RATIO, MAX_RATIO, 1.0);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    /// Pre-authored markup carries its own prosody; force identity values so the
    /// provider does not scale it a second time.
    pub fn reset_for_preauthored_markup(&mut self) {
        self.rate = 1.0;
        self.volume = MAX_VOLUME;
        self.style_intensity = 1.0;
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn style_intensity(&self) -> f64 {
        self.style_intensity
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn is_identity(&self) -> bool {
        self.rate == 1.0 && self.volume == MAX_VOLUME && self.style_intensity == 1.0
    }
}

/// Prosody in the standard provider's native scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardProsody {
    pub rate: f64,
    pub volume: f64,
    pub style_degree: f64,
}

impl From<&SynthesisParameters> for StandardProsody {
    fn from(params: &SynthesisParameters) -> Self {
        Self {
            rate: clamp_finite(params.rate, MIN_RATIO, MAX_RATIO, 1.0),
            volume: clamp_finite(params.volume, MIN_VOLUME, MAX_VOLUME, MAX_VOLUME),
            style_degree: clamp_finite(params.style_intensity, MIN_STYLE_DEGREE, MAX_RATIO, 1.0),
        }
    }
}

/// Prosody in the streaming provider's native ratio scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamingProsody {
    pub speed_ratio: f64,
    pub volume_ratio: f64,
    pub pitch_ratio: f64,
}

impl StreamingProsody {
    /// Native no-op ratios
    pub fn identity() -> Self {
        Self {
            speed_ratio: 1.0,
            volume_ratio: 1.0,
            pitch_ratio: 1.0,
        }
    }
}

impl From<&SynthesisParameters> for StreamingProsody {
    fn from(params: &SynthesisParameters) -> Self {
        Self {
            speed_ratio: clamp_ratio(params.rate),
            volume_ratio: streaming_volume_ratio(params.volume),
            pitch_ratio: clamp_ratio(params.style_intensity),
        }
    }
}

/// Clamp a multiplier into the streaming provider's accepted `[0.5, 2.0]` range
pub fn clamp_ratio(value: f64) -> f64 {
    clamp_finite(value, MIN_RATIO, MAX_RATIO, 1.0)
}

/// Unified volume percentage to the streaming provider's multiplier: `v / 50` clamped
pub fn streaming_volume_ratio(volume: f64) -> f64 {
    clamp_ratio(volume / 50.0)
}
