/// Keys the controller binds while mounted.
///
/// The host forwards key presses only when no text-input element has
/// focus; that filtering happens outside the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Play/pause toggle (debounced on the keyboard channel).
    Space,
    /// Alternate play/pause toggle.
    KeyK,
    /// Mute toggle.
    KeyM,
    /// Fullscreen toggle.
    KeyF,
    /// Seek back 5 seconds.
    ArrowLeft,
    /// Seek forward 5 seconds.
    ArrowRight,
    /// Volume up 10%.
    ArrowUp,
    /// Volume down 10%.
    ArrowDown,
}
