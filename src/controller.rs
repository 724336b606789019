//! LED controller with a stimulus queue and timed on/off control.
//!
//! Provides [`LedController`], which renders queued stimuli to an
//! [`LedOutput`] and turns them off again once their duration has elapsed.
//! Timing only advances when the caller invokes
//! [`poll_timing`](LedController::poll_timing).

use crate::command::LightAction;
use crate::output::{DiscreteOutput, LedOutput, PinDriver, PixelDriver, PixelOutput, RgbwPins};
use crate::queue::{DEFAULT_QUEUE_SIZE, StimulusQueue};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{LedError, Polarity, Rgbw, Stimulus};

/// Pending auto-off for the shown stimulus.
#[derive(Debug, Clone, Copy)]
struct OffTimer<I> {
    started: I,
    hold_ms: u16,
}

/// Drives one RGB/RGBW LED (or a pixel string acting as one) from a fixed
/// queue of stimuli.
///
/// The controller keeps a cursor into the queue. Color and duration setters
/// act on the selected slot, and [`activate`](Self::activate) shows it. A shown
/// stimulus is turned off by the first [`poll_timing`](Self::poll_timing) call
/// made at or after its expiry, unless its duration is
/// [`Stimulus::INDEFINITE`].
///
/// [`initialize`](Self::initialize) must be called once before anything else
/// touches the output; until then the hardware state is unspecified.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `O` - Output backend
/// * `T` - Time source implementation type
/// * `N` - Number of queue slots
pub struct LedController<
    't,
    I: TimeInstant,
    O: LedOutput,
    T: TimeSource<I>,
    const N: usize = DEFAULT_QUEUE_SIZE,
> {
    output: O,
    time_source: &'t T,
    queue: StimulusQueue<N>,
    current: usize,
    shown: Option<usize>,
    timer: Option<OffTimer<I>>,
    polarity: Polarity,
}

impl<'t, I: TimeInstant, O: LedOutput, T: TimeSource<I>, const N: usize>
    LedController<'t, I, O, T, N>
{
    /// Creates a controller for `output` with the default rainbow queue.
    ///
    /// The output is not touched until [`initialize`](Self::initialize).
    pub fn new(output: O, time_source: &'t T) -> Self {
        Self {
            output,
            time_source,
            queue: StimulusQueue::rainbow(),
            current: 0,
            shown: None,
            timer: None,
            polarity: Polarity::default(),
        }
    }

    /// Prepares the output, turns every channel off and refills the queue
    /// with the default rainbow cycle. The cursor returns to slot 0.
    pub fn initialize(&mut self) {
        self.output.begin();
        self.output.set_polarity(self.polarity);
        self.deactivate();
        self.queue.reset();
        self.current = 0;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "led initialized: {} channels, {} slots",
            self.output.channel_count(),
            N
        );
    }

    /// Handles a light action by dispatching to the matching method.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - `Select` or `ActivateIndex` named a slot past the queue
    pub fn handle_action(&mut self, action: LightAction) -> Result<(), LedError> {
        match action {
            LightAction::Select(index) => self.select(index)?,
            LightAction::Activate => self.activate(),
            LightAction::ActivateIndex(index) => self.activate_index(index)?,
            LightAction::Deactivate => self.deactivate(),
            LightAction::SetColor(color) => self.set_color(color),
            LightAction::SetPacked(packed) => self.set_packed(packed),
            LightAction::SetDuration(millis) => self.set_duration(millis),
            LightAction::SetPolarity(polarity) => self.set_polarity(polarity),
        }
        Ok(())
    }

    /// Sets the output polarity and turns the light off.
    ///
    /// Only discrete-pin outputs are affected. Stored colors are unchanged.
    pub fn set_polarity(&mut self, polarity: Polarity) {
        self.polarity = polarity;
        self.output.set_polarity(polarity);
        self.deactivate();
    }

    /// Moves the cursor to `index` without changing what is shown.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - `index` is not below the queue capacity; the cursor is unchanged
    pub fn select(&mut self, index: usize) -> Result<(), LedError> {
        if index >= N {
            #[cfg(feature = "defmt")]
            defmt::warn!("rejected stimulus index {} (capacity {})", index, N);

            return Err(LedError::IndexOutOfRange { index, capacity: N });
        }

        self.current = index;
        Ok(())
    }

    /// Selects the slot at `index` and shows it.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - `index` is not below the queue capacity; nothing changes
    pub fn activate_index(&mut self, index: usize) -> Result<(), LedError> {
        self.select(index)?;
        self.activate();
        Ok(())
    }

    /// Shows the selected slot and starts its off timer.
    ///
    /// Re-activating a shown slot restarts its timer. An indefinite slot
    /// cancels any pending auto-off.
    pub fn activate(&mut self) {
        self.render();

        let stimulus = self.queue[self.current];
        self.timer = if stimulus.is_indefinite() {
            None
        } else {
            Some(OffTimer {
                started: self.time_source.now(),
                hold_ms: stimulus.duration_ms,
            })
        };
        self.shown = Some(self.current);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "stimulus {} on for {} ms",
            self.current,
            stimulus.duration_ms
        );
    }

    /// Turns every channel off and cancels any pending auto-off.
    ///
    /// Safe to call when already off.
    pub fn deactivate(&mut self) {
        for channel in 0..self.output.channel_count() {
            self.output.set_channel(channel, 0);
        }
        self.output.commit();

        self.timer = None;
        self.shown = None;
    }

    /// Turns the light off if the shown stimulus has expired.
    ///
    /// Must be called often relative to the shortest configured duration;
    /// the light stays on until the first call at or after expiry.
    ///
    /// The gap between activation and a poll must also stay below the time
    /// source's wrap period (about 49.7 days for [`Millis`](crate::Millis)).
    /// Elapsed time is measured modulo that period, so a poll arriving more
    /// than a full period late can see the stimulus as not yet expired.
    ///
    /// # Returns
    /// `true` if this call turned the light off.
    pub fn poll_timing(&mut self) -> bool {
        let Some(timer) = self.timer else {
            return false;
        };

        let elapsed = self.time_source.now().duration_since(timer.started);
        if elapsed.as_millis() < u64::from(timer.hold_ms) {
            return false;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("stimulus {} expired", self.shown);

        self.deactivate();
        true
    }

    /// Sets the selected slot's color from red, green and blue; white is set to 0.
    ///
    /// Arguments map positionally to channels 0, 1 and 2.
    pub fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.set_color(Rgbw::rgb(red, green, blue));
    }

    /// Sets the selected slot's color from all four channels.
    pub fn set_rgbw(&mut self, red: u8, green: u8, blue: u8, white: u8) {
        self.set_color(Rgbw::new(red, green, blue, white));
    }

    /// Sets the selected slot's color.
    ///
    /// If the slot is currently shown, the output updates immediately.
    pub fn set_color(&mut self, color: Rgbw) {
        self.queue_mut_current().channels = color;
        self.refresh_if_shown();
    }

    /// Sets the selected slot's color from a packed integer, channel `i` in
    /// bits `[8i, 8i + 8)`.
    ///
    /// Only as many channels as the output drives are written; the rest keep
    /// their stored value.
    pub fn set_packed(&mut self, packed: u32) {
        let unpacked = Rgbw::from_packed(packed);
        let count = self.output.channel_count();
        let slot = self.queue_mut_current();
        for (stored, value) in slot.channels.0.iter_mut().zip(unpacked.0).take(count) {
            *stored = value;
        }
        self.refresh_if_shown();
    }

    /// Sets the selected slot's duration in milliseconds.
    ///
    /// A running off timer keeps its old duration; the new one applies from
    /// the next activation.
    pub fn set_duration(&mut self, millis: u16) {
        self.queue_mut_current().duration_ms = millis;
    }

    /// Index of the selected slot.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Returns true if a stimulus is shown.
    pub fn is_lit(&self) -> bool {
        self.shown.is_some()
    }

    /// Index of the shown slot, if lit.
    pub fn shown_index(&self) -> Option<usize> {
        self.shown
    }

    /// Current output polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Number of channels the output drives (3 or 4).
    pub fn channel_count(&self) -> usize {
        self.output.channel_count()
    }

    /// Returns the stimulus queue.
    pub fn queue(&self) -> &StimulusQueue<N> {
        &self.queue
    }

    /// Returns the stimulus at `index`, if in range.
    pub fn stimulus(&self, index: usize) -> Option<&Stimulus> {
        self.queue.get(index)
    }

    /// Returns the selected stimulus.
    pub fn current_stimulus(&self) -> &Stimulus {
        &self.queue[self.current]
    }

    /// Instant at which the shown stimulus expires, if an auto-off is pending.
    pub fn expiry_time(&self) -> Option<I> {
        let timer = self.timer?;
        timer
            .started
            .checked_add(I::Duration::from_millis(u64::from(timer.hold_ms)))
    }

    /// Time left until the pending auto-off, if any.
    ///
    /// Zero once the stimulus has expired but has not been polled yet.
    pub fn time_remaining(&self) -> Option<I::Duration> {
        let timer = self.timer?;
        let elapsed = self.time_source.now().duration_since(timer.started);
        Some(I::Duration::from_millis(u64::from(timer.hold_ms)).saturating_sub(elapsed))
    }

    /// Returns the output backend.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Consumes the controller and returns the output backend.
    pub fn release(self) -> O {
        self.output
    }

    fn queue_mut_current(&mut self) -> &mut Stimulus {
        // `current` only changes through `select`, which keeps it below N.
        &mut self.queue.as_mut_slice()[self.current]
    }

    fn refresh_if_shown(&mut self) {
        if self.shown == Some(self.current) {
            self.render();
        }
    }

    /// Writes the selected slot to every channel and commits the frame.
    fn render(&mut self) {
        let channels = self.queue[self.current].channels;
        for channel in 0..self.output.channel_count() {
            self.output.set_channel(channel, channels.0[channel]);
        }
        self.output.commit();
    }
}

impl<'t, I, D, T, const N: usize> LedController<'t, I, DiscreteOutput<D>, T, N>
where
    I: TimeInstant,
    D: PinDriver,
    T: TimeSource<I>,
{
    /// Creates a controller driving discrete PWM pins.
    pub fn discrete(driver: D, pins: RgbwPins<D::Pin>, time_source: &'t T) -> Self {
        Self::new(DiscreteOutput::new(driver, pins), time_source)
    }
}

impl<'t, I, D, T, const N: usize> LedController<'t, I, PixelOutput<D>, T, N>
where
    I: TimeInstant,
    D: PixelDriver,
    T: TimeSource<I>,
{
    /// Creates a controller driving `count` addressable pixels as one unit.
    pub fn pixels(driver: D, count: usize, time_source: &'t T) -> Self {
        Self::new(PixelOutput::with_count(driver, count), time_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PinMode;
    use crate::queue::{DEFAULT_DURATION_MS, DefaultColor};
    use crate::time::{Millis, MillisDuration};
    use core::cell::Cell;

    // Mock pins that remember the last level written to each
    struct MockPins {
        levels: [u8; 4],
        writes: usize,
    }

    impl MockPins {
        fn new() -> Self {
            Self {
                levels: [0xAA; 4],
                writes: 0,
            }
        }
    }

    impl PinDriver for MockPins {
        type Pin = usize;

        fn set_pin_mode(&mut self, _pin: usize, _mode: PinMode) {}

        fn write_intensity(&mut self, pin: usize, level: u8) {
            self.levels[pin] = level;
            self.writes += 1;
        }
    }

    // Mock clock with controllable time
    struct MockClock {
        now: Cell<Millis>,
    }

    impl MockClock {
        fn at(millis: u32) -> Self {
            Self {
                now: Cell::new(Millis(millis)),
            }
        }

        fn advance(&self, millis: u32) {
            let now = self.now.get();
            self.now.set(Millis(now.0.wrapping_add(millis)));
        }
    }

    impl TimeSource<Millis> for MockClock {
        fn now(&self) -> Millis {
            self.now.get()
        }
    }

    type Controller<'t> = LedController<'t, Millis, DiscreteOutput<MockPins>, MockClock>;

    fn rgb_controller(clock: &MockClock) -> Controller<'_> {
        let mut led = Controller::discrete(MockPins::new(), RgbwPins::rgb(0, 1, 2), clock);
        led.initialize();
        led
    }

    fn levels(led: &Controller<'_>) -> [u8; 4] {
        led.output().driver().levels
    }

    #[test]
    fn initialize_turns_channels_off_and_fills_rainbow() {
        let clock = MockClock::at(0);
        let led = rgb_controller(&clock);

        assert!(!led.is_lit());
        assert_eq!(led.current_index(), 0);
        // Only the three RGB pins are written.
        assert_eq!(levels(&led), [0, 0, 0, 0xAA]);
        assert_eq!(led.current_stimulus().channels, DefaultColor::Red.rgbw());
        assert_eq!(led.current_stimulus().duration_ms, DEFAULT_DURATION_MS);
    }

    #[test]
    fn activate_renders_and_schedules_expiry() {
        let clock = MockClock::at(1_000);
        let mut led = rgb_controller(&clock);

        led.activate_index(0).unwrap();

        assert!(led.is_lit());
        assert_eq!(levels(&led)[..3], [0x0F, 0, 0]);
        assert_eq!(led.expiry_time(), Some(Millis(1_100)));
        assert_eq!(led.time_remaining(), Some(MillisDuration(100)));
    }

    #[test]
    fn poll_turns_off_at_expiry_not_before() {
        let clock = MockClock::at(0);
        let mut led = rgb_controller(&clock);
        led.activate_index(2).unwrap();

        clock.advance(99);
        assert!(!led.poll_timing());
        assert!(led.is_lit());

        clock.advance(1);
        assert!(led.poll_timing());
        assert!(!led.is_lit());
        assert_eq!(levels(&led)[..3], [0, 0, 0]);
        assert_eq!(led.expiry_time(), None);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_side_effects() {
        let clock = MockClock::at(0);
        let mut led = rgb_controller(&clock);
        led.select(3).unwrap();

        assert_eq!(
            led.activate_index(6),
            Err(LedError::IndexOutOfRange {
                index: 6,
                capacity: 6
            })
        );
        assert_eq!(led.current_index(), 3);
        assert!(!led.is_lit());
    }

    #[test]
    fn indefinite_stimulus_cancels_previous_timer() {
        let clock = MockClock::at(0);
        let mut led = rgb_controller(&clock);
        led.activate_index(0).unwrap();

        led.select(1).unwrap();
        led.set_duration(Stimulus::INDEFINITE);
        led.activate();

        clock.advance(60_000);
        assert!(!led.poll_timing());
        assert!(led.is_lit());
        assert_eq!(led.expiry_time(), None);
    }

    #[test]
    fn recolor_of_unshown_slot_leaves_output_alone() {
        let clock = MockClock::at(0);
        let mut led = rgb_controller(&clock);
        led.activate_index(0).unwrap();
        let writes = led.output().driver().writes;

        led.select(4).unwrap();
        led.set_rgb(0x20, 0x30, 0x40);

        assert_eq!(led.output().driver().writes, writes);
        assert_eq!(levels(&led)[..3], [0x0F, 0, 0]);
    }

    #[test]
    fn handle_action_dispatches_to_controller() {
        let clock = MockClock::at(0);
        let mut led = rgb_controller(&clock);

        led.handle_action(LightAction::Select(1)).unwrap();
        led.handle_action(LightAction::SetPacked(0x0030_2010)).unwrap();
        led.handle_action(LightAction::SetDuration(5)).unwrap();
        led.handle_action(LightAction::Activate).unwrap();
        assert_eq!(levels(&led)[..3], [0x10, 0x20, 0x30]);
        assert_eq!(led.shown_index(), Some(1));

        led.handle_action(LightAction::SetPolarity(Polarity::ActiveLow)).unwrap();
        assert!(!led.is_lit());
        assert_eq!(levels(&led)[..3], [0xFF, 0xFF, 0xFF]);

        assert!(led.handle_action(LightAction::ActivateIndex(9)).is_err());
    }
}
