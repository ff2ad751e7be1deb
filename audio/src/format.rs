//! PCM audio format description.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Describes interleaved integer PCM audio.
///
/// Equality is structural. The all-zero [`AudioFormat::NULL`] stands for
/// "no format" and is rejected by every factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz (e.g., 16000, 44100).
    pub sample_rate: u32,
    /// Bits per sample (e.g., 16).
    pub bit_width: u16,
    /// Number of interleaved channels.
    pub channels: u8,
}

impl AudioFormat {
    /// The null format: no rate, no width, no channels.
    pub const NULL: AudioFormat = AudioFormat::new(0, 0, 0);

    /// Creates a new format.
    pub const fn new(sample_rate: u32, bit_width: u16, channels: u8) -> Self {
        Self {
            sample_rate,
            bit_width,
            channels,
        }
    }

    /// Returns true for [`AudioFormat::NULL`].
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Number of bytes in one frame (one sample for every channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * (self.bit_width as usize / 8)
    }

    /// Number of bytes in one second of audio.
    pub fn bytes_per_second(&self) -> usize {
        self.bytes_per_frame() * self.sample_rate as usize
    }

    /// Number of whole frames in `bytes`.
    pub fn frames(&self, bytes: usize) -> usize {
        match self.bytes_per_frame() {
            0 => 0,
            bpf => bytes / bpf,
        }
    }

    /// Playback duration of `bytes` worth of audio.
    pub fn bytes_to_duration(&self, bytes: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.frames(bytes) as u64;
        Duration::from_nanos(frames * 1_000_000_000 / self.sample_rate as u64)
    }

    /// Number of bytes covering `duration`, rounded to the nearest whole frame.
    pub fn duration_to_bytes(&self, duration: Duration) -> usize {
        let frames = (duration.as_secs_f64() * self.sample_rate as f64).round() as usize;
        frames * self.bytes_per_frame()
    }

    /// Returns a copy with a different sample rate.
    pub const fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    /// Returns a copy with a different channel count.
    pub const fn with_channels(self, channels: u8) -> Self {
        Self { channels, ..self }
    }
}

// Common format presets
impl AudioFormat {
    /// 8kHz 16-bit mono (narrowband voice).
    pub const MONO_8K_16: AudioFormat = AudioFormat::new(8000, 16, 1);
    /// 16kHz 16-bit mono (wideband voice).
    pub const MONO_16K_16: AudioFormat = AudioFormat::new(16000, 16, 1);
    /// 44.1kHz 16-bit stereo (CD quality).
    pub const STEREO_44K_16: AudioFormat = AudioFormat::new(44100, 16, 2);
    /// 48kHz 16-bit stereo.
    pub const STEREO_48K_16: AudioFormat = AudioFormat::new(48000, 16, 2);
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Hz/{}bit/{}ch",
            self.sample_rate, self.bit_width, self.channels
        )
    }
}
