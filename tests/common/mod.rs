//! Shared test infrastructure for rgbw-stim integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use rgbw_stim::{
    DiscreteOutput, LedController, Millis, PinDriver, PinMode, PixelDriver, PixelOutput, Rgbw,
    TimeSource,
};

// ============================================================================
// Mock Pin Driver
// ============================================================================

/// Mock discrete pin driver that records pin modes and every intensity write
pub struct MockPins {
    levels: [Option<u8>; 16],
    modes: [Option<PinMode>; 16],
    write_history: heapless::Vec<(u8, u8), 64>,
}

impl MockPins {
    pub fn new() -> Self {
        Self {
            levels: [None; 16],
            modes: [None; 16],
            write_history: heapless::Vec::new(),
        }
    }

    /// Last level written to `pin`, if any
    pub fn level(&self, pin: u8) -> Option<u8> {
        self.levels[pin as usize]
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes[pin as usize]
    }

    pub fn write_history(&self) -> &[(u8, u8)] {
        &self.write_history
    }
}

impl PinDriver for MockPins {
    type Pin = u8;

    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        self.modes[pin as usize] = Some(mode);
    }

    fn write_intensity(&mut self, pin: u8, level: u8) {
        self.levels[pin as usize] = Some(level);
        let _ = self.write_history.push((pin, level));
    }
}

// ============================================================================
// Mock Pixel Driver
// ============================================================================

/// Mock pixel string that records staged pixels and committed frames
pub struct MockPixels {
    began: bool,
    staged: [Rgbw; 8],
    shown: [Rgbw; 8],
    show_count: usize,
}

impl MockPixels {
    pub fn new() -> Self {
        Self {
            began: false,
            staged: [Rgbw::new(0xAA, 0xAA, 0xAA, 0xAA); 8],
            shown: [Rgbw::new(0xAA, 0xAA, 0xAA, 0xAA); 8],
            show_count: 0,
        }
    }

    pub fn began(&self) -> bool {
        self.began
    }

    /// Color of `index` as of the last `show`
    pub fn shown(&self, index: usize) -> Rgbw {
        self.shown[index]
    }

    pub fn show_count(&self) -> usize {
        self.show_count
    }
}

impl PixelDriver for MockPixels {
    fn begin(&mut self) {
        self.began = true;
    }

    fn set_pixel(&mut self, index: usize, color: Rgbw) {
        self.staged[index] = color;
    }

    fn show(&mut self) {
        self.shown = self.staged;
        self.show_count += 1;
    }
}

// ============================================================================
// Mock Clock
// ============================================================================

/// Mock millisecond clock with controllable time advancement
pub struct MockClock {
    current_time: core::cell::Cell<Millis>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(Millis(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like a hardware counter
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }
}

impl TimeSource<Millis> for MockClock {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Controller Aliases and Helpers
// ============================================================================

pub const RED_PIN: u8 = 3;
pub const GREEN_PIN: u8 = 5;
pub const BLUE_PIN: u8 = 6;
pub const WHITE_PIN: u8 = 9;

pub type PinController<'t> = LedController<'t, Millis, DiscreteOutput<MockPins>, MockClock>;
pub type PixelController<'t> = LedController<'t, Millis, PixelOutput<MockPixels>, MockClock>;

/// Initialized three-channel controller on the standard test pins
pub fn rgb_controller(clock: &MockClock) -> PinController<'_> {
    let output = DiscreteOutput::from_raw_pins(
        MockPins::new(),
        RED_PIN,
        GREEN_PIN,
        BLUE_PIN,
        rgbw_stim::UNUSED_PIN,
    );
    let mut led = PinController::new(output, clock);
    led.initialize();
    led
}

/// Initialized four-channel controller on the standard test pins
pub fn rgbw_controller(clock: &MockClock) -> PinController<'_> {
    let output =
        DiscreteOutput::from_raw_pins(MockPins::new(), RED_PIN, GREEN_PIN, BLUE_PIN, WHITE_PIN);
    let mut led = PinController::new(output, clock);
    led.initialize();
    led
}

/// Initialized controller driving `count` mock pixels
pub fn pixel_controller(clock: &MockClock, count: usize) -> PixelController<'_> {
    let mut led = PixelController::pixels(MockPixels::new(), count, clock);
    led.initialize();
    led
}

/// Levels currently on the R, G, B pins
pub fn rgb_levels<const N: usize>(
    led: &LedController<'_, Millis, DiscreteOutput<MockPins>, MockClock, N>,
) -> [Option<u8>; 3] {
    let pins = led.output().driver();
    [
        pins.level(RED_PIN),
        pins.level(GREEN_PIN),
        pins.level(BLUE_PIN),
    ]
}
