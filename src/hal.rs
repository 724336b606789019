//! Adapters from common embedded driver traits to the output capabilities.

use embedded_hal::pwm::SetDutyCycle;
use smart_leds::{RGB8, RGBW, SmartLedsWrite, White};

use crate::output::{PinDriver, PinMode, PixelDriver};
use crate::types::Rgbw;

/// A bank of PWM channels addressed by array index.
///
/// Levels 0-255 are scaled onto each channel's duty cycle range. PWM channels
/// are always outputs, so pin mode configuration is a no-op.
pub struct PwmBank<C: SetDutyCycle, const N: usize> {
    channels: [C; N],
}

impl<C: SetDutyCycle, const N: usize> PwmBank<C, N> {
    /// Wraps the given PWM channels. Channel `i` is pin `i`, so the bank plugs
    /// straight into [`DiscreteOutput::from_raw_pins`](crate::DiscreteOutput::from_raw_pins).
    pub fn new(channels: [C; N]) -> Self {
        Self { channels }
    }

    /// Returns the wrapped channels.
    pub fn channels(&self) -> &[C; N] {
        &self.channels
    }

    /// Consumes the bank and returns the PWM channels.
    pub fn release(self) -> [C; N] {
        self.channels
    }
}

impl<C: SetDutyCycle, const N: usize> PinDriver for PwmBank<C, N> {
    type Pin = u8;

    fn set_pin_mode(&mut self, _pin: u8, _mode: PinMode) {}

    fn write_intensity(&mut self, pin: u8, level: u8) {
        let Some(channel) = self.channels.get_mut(usize::from(pin)) else {
            return;
        };

        // Hardware errors can't be reported past this point.
        if channel
            .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("pwm write failed on channel {}", pin);
        }
    }
}

impl From<Rgbw> for RGB8 {
    /// RGB8 pixels have no white element, so white is dropped.
    fn from(color: Rgbw) -> Self {
        RGB8::new(color.red(), color.green(), color.blue())
    }
}

impl From<Rgbw> for RGBW<u8> {
    fn from(color: Rgbw) -> Self {
        RGBW {
            r: color.red(),
            g: color.green(),
            b: color.blue(),
            a: White(color.white()),
        }
    }
}

/// An addressable LED string behind a `smart-leds` writer.
///
/// Holds a frame buffer of `N` pixels in the writer's color type and writes it
/// out on [`show`](PixelDriver::show). Writers taking `RGBW<u8>` receive the
/// white channel; `RGB8` writers drop it.
pub struct SmartLedString<W, const N: usize>
where
    W: SmartLedsWrite,
{
    writer: W,
    buffer: [W::Color; N],
}

impl<W, const N: usize> SmartLedString<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgbw> + Clone,
{
    /// Wraps a `smart-leds` writer driving `N` pixels.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: core::array::from_fn(|_| Rgbw::OFF.into()),
        }
    }

    /// Returns the frame buffer as last staged.
    pub fn buffer(&self) -> &[W::Color; N] {
        &self.buffer
    }

    /// Returns a reference to the writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consumes the string and returns the writer.
    pub fn release(self) -> W {
        self.writer
    }
}

impl<W, const N: usize> PixelDriver for SmartLedString<W, N>
where
    W: SmartLedsWrite,
    W::Color: From<Rgbw> + Clone,
{
    fn begin(&mut self) {
        for pixel in self.buffer.iter_mut() {
            *pixel = Rgbw::OFF.into();
        }
    }

    fn set_pixel(&mut self, index: usize, color: Rgbw) {
        if let Some(pixel) = self.buffer.get_mut(index) {
            *pixel = color.into();
        }
    }

    fn show(&mut self) {
        if self.writer.write(self.buffer.iter().cloned()).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("led string write failed");
        }
    }
}
