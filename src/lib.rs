#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`LedController`**: Owns the output and the stimulus queue, shows the selected stimulus and turns it off when its duration elapses
//! - **`Stimulus`**: A color (`Rgbw`) plus a duration in milliseconds; `Stimulus::INDEFINITE` never expires
//! - **`StimulusQueue`**: Fixed array of stimuli, pre-filled with a rainbow cycle
//! - **`LedOutput`**: The backend contract, implemented by `DiscreteOutput` (PWM pins) and `PixelOutput` (addressable pixels)
//! - **`PinDriver`** / **`PixelDriver`**: Traits to implement for your hardware, or use the adapters in [`hal`]
//! - **`TimeSource`**: Trait to implement for your millisecond clock
//! - **`Polarity`**: Whether a high pin level turns a discrete channel on
//! - **`LightAction`**: Commands that can be sent to control a controller
//!
//! Nothing runs in the background. Call `LedController::poll_timing` from your
//! main loop or tick handler, well below the shortest stimulus duration.

pub mod colors;
pub mod command;
pub mod controller;
pub mod hal;
pub mod output;
pub mod queue;
pub mod time;
pub mod types;

pub use command::LightAction;
pub use controller::LedController;
pub use output::{
    DiscreteOutput, LedOutput, PinDriver, PinMode, PixelDriver, PixelOutput, RgbwPins, UNUSED_PIN,
};
pub use queue::{
    DEFAULT_DURATION_MS, DEFAULT_PALETTE, DEFAULT_QUEUE_SIZE, DefaultColor, StimulusQueue,
};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{LedError, MAX_CHANNELS, Polarity, Rgbw, Stimulus};
