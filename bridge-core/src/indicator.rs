//! Activity indicator trait.

/// Visual activity indicator (typically an LED).
///
/// The bridge sets it idle at the start of every iteration and active while
/// a payload moves in either direction.
pub trait Indicator {
    /// Show activity.
    fn set_active(&mut self);

    /// Show no activity.
    fn set_idle(&mut self);
}

/// Indicator for boards without one.
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn set_active(&mut self) {}

    fn set_idle(&mut self) {}
}
