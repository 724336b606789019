//! Core types for stimulus configuration.

use palette::Srgb;

/// Number of color channels a stimulus can hold (red, green, blue, white).
pub const MAX_CHANNELS: usize = 4;

/// Per-channel intensities of a stimulus, in positional order R, G, B, W.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgbw(pub [u8; MAX_CHANNELS]);

impl Rgbw {
    /// All channels at zero intensity.
    pub const OFF: Self = Rgbw([0; MAX_CHANNELS]);

    /// Creates an RGBW value.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, white: u8) -> Self {
        Rgbw([red, green, blue, white])
    }

    /// Creates an RGB value with the white channel off.
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Rgbw([red, green, blue, 0])
    }

    /// Decodes a packed integer where channel `i` occupies bits `[8i, 8i + 8)`.
    ///
    /// Red is the low byte, white the high byte.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Rgbw(packed.to_le_bytes())
    }

    /// Packs the channels back into an integer, red in the low byte.
    #[inline]
    pub const fn to_packed(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Returns the intensity of channel `index`, or `None` past the white channel.
    #[inline]
    pub fn channel(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    pub const fn red(&self) -> u8 {
        self.0[0]
    }

    pub const fn green(&self) -> u8 {
        self.0[1]
    }

    pub const fn blue(&self) -> u8 {
        self.0[2]
    }

    pub const fn white(&self) -> u8 {
        self.0[3]
    }

    /// Returns true if every channel is zero.
    pub fn is_off(&self) -> bool {
        self.0 == [0; MAX_CHANNELS]
    }
}

impl From<[u8; MAX_CHANNELS]> for Rgbw {
    fn from(channels: [u8; MAX_CHANNELS]) -> Self {
        Rgbw(channels)
    }
}

impl From<Srgb<u8>> for Rgbw {
    fn from(color: Srgb<u8>) -> Self {
        Rgbw::rgb(color.red, color.green, color.blue)
    }
}

impl From<Rgbw> for Srgb<u8> {
    /// Drops the white channel.
    fn from(color: Rgbw) -> Self {
        Srgb::new(color.red(), color.green(), color.blue())
    }
}

/// One slot of the stimulus queue: a color and how long it stays lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stimulus {
    /// Channel intensities.
    pub channels: Rgbw,

    /// Time the stimulus stays lit once activated, in milliseconds.
    ///
    /// [`Stimulus::INDEFINITE`] means the stimulus never expires on its own.
    pub duration_ms: u16,
}

impl Stimulus {
    /// Duration sentinel for a stimulus that stays lit until turned off.
    pub const INDEFINITE: u16 = u16::MAX;

    /// Creates a stimulus.
    #[inline]
    pub const fn new(channels: Rgbw, duration_ms: u16) -> Self {
        Self {
            channels,
            duration_ms,
        }
    }

    /// Returns true if this stimulus never auto-expires.
    #[inline]
    pub const fn is_indefinite(&self) -> bool {
        self.duration_ms == Self::INDEFINITE
    }
}

/// Output polarity of discrete-pin channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// A high output level turns the channel on. Typical for common-cathode LEDs.
    #[default]
    ActiveHigh,

    /// A low output level turns the channel on. Typical for common-anode LEDs.
    ActiveLow,
}

impl Polarity {
    /// Maps a logical intensity to the level written to the pin.
    #[inline]
    pub const fn apply(self, level: u8) -> u8 {
        match self {
            Polarity::ActiveHigh => level,
            Polarity::ActiveLow => u8::MAX - level,
        }
    }

    /// Pin level that turns a channel fully off.
    #[inline]
    pub const fn off_level(self) -> u8 {
        self.apply(0)
    }
}

impl From<bool> for Polarity {
    /// `true` selects [`Polarity::ActiveHigh`].
    fn from(active_high: bool) -> Self {
        if active_high {
            Polarity::ActiveHigh
        } else {
            Polarity::ActiveLow
        }
    }
}

/// Controller errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Queue index past the end of the stimulus queue.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Queue capacity.
        capacity: usize,
    },
}

impl core::fmt::Display for LedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedError::IndexOutOfRange { index, capacity } => {
                write!(
                    f,
                    "stimulus index {} out of range for queue of {}",
                    index, capacity
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LedError {}
