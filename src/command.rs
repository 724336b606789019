//! Command-based control for controllers.

use crate::types::{Polarity, Rgbw};

/// Actions for controlling an [`LedController`](crate::LedController).
///
/// Lets a scheduler pass requests through a channel and have the owner of
/// the controller apply them in one place with
/// [`handle_action`](crate::LedController::handle_action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightAction {
    /// Move the cursor to a queue slot.
    Select(usize),
    /// Show the selected slot.
    Activate,
    /// Select and show a queue slot.
    ActivateIndex(usize),
    /// Turn the light off.
    Deactivate,
    /// Overwrite the selected slot's color.
    SetColor(Rgbw),
    /// Overwrite the selected slot's color from a packed integer.
    SetPacked(u32),
    /// Overwrite the selected slot's duration in milliseconds.
    SetDuration(u16),
    /// Change output polarity.
    SetPolarity(Polarity),
}
