//! Fixed-capacity stimulus queue.

use crate::types::{Rgbw, Stimulus};

/// Default number of stimulus slots.
pub const DEFAULT_QUEUE_SIZE: usize = 6;

/// Duration given to every slot when the queue is pre-filled.
pub const DEFAULT_DURATION_MS: u16 = 100;

/// Rainbow cycle used to pre-fill the queue: red, yellow, green, cyan, blue, magenta.
pub const DEFAULT_PALETTE: [Rgbw; 6] = [
    Rgbw::rgb(0x0F, 0x00, 0x00),
    Rgbw::rgb(0x0F, 0x0F, 0x00),
    Rgbw::rgb(0x00, 0x0F, 0x00),
    Rgbw::rgb(0x00, 0x0F, 0x0F),
    Rgbw::rgb(0x00, 0x00, 0x0F),
    Rgbw::rgb(0x0F, 0x00, 0x0F),
];

/// Named indices into [`DEFAULT_PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DefaultColor {
    Red = 0,
    Yellow = 1,
    Green = 2,
    Cyan = 3,
    Blue = 4,
    Magenta = 5,
}

impl DefaultColor {
    /// Returns the palette entry for this color.
    pub const fn rgbw(self) -> Rgbw {
        DEFAULT_PALETTE[self as usize]
    }
}

/// A fixed array of `N` stimuli, indexed `0..N`.
///
/// Slots are overwritten in place and never added or removed, so every index
/// below `N` always holds a valid stimulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusQueue<const N: usize> {
    slots: [Stimulus; N],
}

impl<const N: usize> StimulusQueue<N> {
    /// Creates a queue pre-filled with the default rainbow cycle.
    ///
    /// When `N` differs from the palette length the palette repeats.
    pub fn rainbow() -> Self {
        const { assert!(N > 0, "stimulus queue needs at least one slot") };

        Self {
            slots: core::array::from_fn(|i| {
                Stimulus::new(
                    DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()],
                    DEFAULT_DURATION_MS,
                )
            }),
        }
    }

    /// Refills every slot with the default rainbow cycle.
    pub fn reset(&mut self) {
        *self = Self::rainbow();
    }

    /// Returns the stimulus at `index`, if in range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Stimulus> {
        self.slots.get(index)
    }

    /// Returns a mutable reference to the stimulus at `index`, if in range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Stimulus> {
        self.slots.get_mut(index)
    }

    /// Iterates over all slots in index order.
    pub fn iter(&self) -> core::slice::Iter<'_, Stimulus> {
        self.slots.iter()
    }

    /// Number of slots. Always `N`.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false; a queue has at least one slot.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns all slots as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Stimulus] {
        &mut self.slots
    }
}

impl<const N: usize> Default for StimulusQueue<N> {
    fn default() -> Self {
        Self::rainbow()
    }
}

impl<const N: usize> core::ops::Index<usize> for StimulusQueue<N> {
    type Output = Stimulus;

    fn index(&self, index: usize) -> &Stimulus {
        &self.slots[index]
    }
}
