//! Timer event delivery control

use crate::error::HalResult;

/// Masking of a timer's edge events
///
/// While masked, the timer keeps counting but neither
/// [`TimerEdge`](crate::TimerEdge) reaches the output stage. Callers pair every
/// `mask_events` with an `unmask_events`.
pub trait TimerEvents {
    /// Hold off delivery of period-elapsed and compare-matched events
    fn mask_events(&mut self) -> HalResult<()>;

    /// Resume event delivery
    fn unmask_events(&mut self) -> HalResult<()>;

    /// Whether delivery is currently held off
    fn events_masked(&self) -> bool;
}
