//! Keyboard contract: Escape closes the topmost overlay, Tab turns on the
//! visible-focus mode, and any pointer click turns it back off.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    /// Keys the dashboard does not react to globally.
    Other,
}
