//! Output backends.
//!
//! The controller only talks to [`LedOutput`]: it sets logical channel
//! intensities and then commits them. Two implementations cover the supported
//! hardware shapes:
//!
//! - [`DiscreteOutput`]: three or four PWM pins (R, G, B and optional W),
//!   written immediately with polarity applied.
//! - [`PixelOutput`]: a string of addressable pixels driven as one unit. The
//!   staged color is pushed to every pixel and shown once per commit, so the
//!   whole string changes in the same frame.
//!
//! The raw hardware is reached through the [`PinDriver`] and [`PixelDriver`]
//! capability traits. See [`crate::hal`] for adapters onto `embedded-hal` PWM
//! channels and `smart-leds` writers.

use heapless::Vec;

use crate::types::{MAX_CHANNELS, Polarity, Rgbw};

/// Pin identifier marking "no white channel" in [`DiscreteOutput::from_raw_pins`].
pub const UNUSED_PIN: u8 = 0xFF;

/// Contract between the controller and its output hardware.
///
/// Levels passed to [`set_channel`](LedOutput::set_channel) are logical
/// intensities: 0 is off, 255 is fully on.
pub trait LedOutput {
    /// Prepares the hardware for output.
    fn begin(&mut self);

    /// Number of channels this output drives (3 or 4).
    fn channel_count(&self) -> usize;

    /// Sets one channel's intensity. Channels past `channel_count` are ignored.
    fn set_channel(&mut self, channel: usize, level: u8);

    /// Makes all channel writes since the last commit visible.
    fn commit(&mut self);

    /// Changes how logical intensities map to output levels.
    ///
    /// Outputs without a polarity concept ignore this.
    fn set_polarity(&mut self, _polarity: Polarity) {}
}

/// Pin direction for [`PinDriver::set_pin_mode`].
///
/// LED pins are only ever driven, so output is the one mode requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Output,
}

/// Discrete pin capability: configure a pin and write an 8-bit intensity to it.
pub trait PinDriver {
    /// Pin identifier.
    type Pin: Copy;

    /// Configures the direction of a pin.
    fn set_pin_mode(&mut self, pin: Self::Pin, mode: PinMode);

    /// Writes an intensity (PWM level) to a pin.
    fn write_intensity(&mut self, pin: Self::Pin, level: u8);
}

/// Addressable pixel capability.
pub trait PixelDriver {
    /// Initializes the pixel hardware.
    fn begin(&mut self);

    /// Stages a color for one pixel. Nothing is visible until [`show`](PixelDriver::show).
    fn set_pixel(&mut self, index: usize, color: Rgbw);

    /// Latches all staged pixels.
    fn show(&mut self);
}

/// Pins of a discrete RGB or RGBW LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbwPins<P> {
    pub red: P,
    pub green: P,
    pub blue: P,
    /// White pin. `None` for an RGB-only LED.
    pub white: Option<P>,
}

impl<P> RgbwPins<P> {
    /// Pins of an RGB LED.
    pub fn rgb(red: P, green: P, blue: P) -> Self {
        Self {
            red,
            green,
            blue,
            white: None,
        }
    }

    /// Pins of an RGBW LED.
    pub fn rgbw(red: P, green: P, blue: P, white: P) -> Self {
        Self {
            red,
            green,
            blue,
            white: Some(white),
        }
    }
}

/// Discrete-pin output: one PWM pin per channel.
pub struct DiscreteOutput<D: PinDriver> {
    driver: D,
    pins: Vec<D::Pin, MAX_CHANNELS>,
    polarity: Polarity,
}

impl<D: PinDriver> DiscreteOutput<D> {
    /// Creates an output for the given pins. The channel count (3 or 4) is
    /// fixed here by whether a white pin is present.
    pub fn new(driver: D, pins: RgbwPins<D::Pin>) -> Self {
        let mut channel_pins = Vec::new();
        // Capacity is MAX_CHANNELS, at most four pushes below.
        let _ = channel_pins.push(pins.red);
        let _ = channel_pins.push(pins.green);
        let _ = channel_pins.push(pins.blue);
        if let Some(white) = pins.white {
            let _ = channel_pins.push(white);
        }

        Self {
            driver,
            pins: channel_pins,
            polarity: Polarity::default(),
        }
    }

    /// Returns the pin driving each channel, in channel order.
    pub fn pins(&self) -> &[D::Pin] {
        &self.pins
    }

    /// Returns the current polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns a reference to the pin driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns a mutable reference to the pin driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consumes the output and returns the pin driver.
    pub fn release(self) -> D {
        self.driver
    }
}

impl<D: PinDriver<Pin = u8>> DiscreteOutput<D> {
    /// Creates an output from raw pin numbers, treating [`UNUSED_PIN`] as
    /// "no white channel".
    pub fn from_raw_pins(driver: D, red: u8, green: u8, blue: u8, white: u8) -> Self {
        let white = (white != UNUSED_PIN).then_some(white);
        Self::new(
            driver,
            RgbwPins {
                red,
                green,
                blue,
                white,
            },
        )
    }
}

impl<D: PinDriver> LedOutput for DiscreteOutput<D> {
    fn begin(&mut self) {
        for &pin in self.pins.iter() {
            self.driver.set_pin_mode(pin, PinMode::Output);
        }
    }

    fn channel_count(&self) -> usize {
        self.pins.len()
    }

    fn set_channel(&mut self, channel: usize, level: u8) {
        if let Some(&pin) = self.pins.get(channel) {
            self.driver.write_intensity(pin, self.polarity.apply(level));
        }
    }

    fn commit(&mut self) {}

    fn set_polarity(&mut self, polarity: Polarity) {
        self.polarity = polarity;
    }
}

/// Pixel-string output: every pixel shows the same color.
pub struct PixelOutput<D: PixelDriver> {
    driver: D,
    count: usize,
    frame: Rgbw,
}

impl<D: PixelDriver> PixelOutput<D> {
    /// Creates an output driving a single pixel.
    pub fn new(driver: D) -> Self {
        Self::with_count(driver, 1)
    }

    /// Creates an output driving `count` pixels as one unit.
    pub fn with_count(driver: D, count: usize) -> Self {
        Self {
            driver,
            count,
            frame: Rgbw::OFF,
        }
    }

    /// Number of pixels in the string.
    pub fn pixel_count(&self) -> usize {
        self.count
    }

    /// Color staged for the next commit.
    pub fn staged(&self) -> Rgbw {
        self.frame
    }

    /// Returns a reference to the pixel driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns a mutable reference to the pixel driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consumes the output and returns the pixel driver.
    pub fn release(self) -> D {
        self.driver
    }
}

impl<D: PixelDriver> LedOutput for PixelOutput<D> {
    fn begin(&mut self) {
        self.driver.begin();
    }

    fn channel_count(&self) -> usize {
        MAX_CHANNELS
    }

    fn set_channel(&mut self, channel: usize, level: u8) {
        if let Some(slot) = self.frame.0.get_mut(channel) {
            *slot = level;
        }
    }

    fn commit(&mut self) {
        for index in 0..self.count {
            self.driver.set_pixel(index, self.frame);
        }
        self.driver.show();
    }
}
