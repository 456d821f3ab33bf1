//! Host windowing service seen by a [`Window`](crate::Window).
//!
//! A display shows finished frames under a surface name and feeds pointer
//! and key input back. [`HeadlessDisplay`] keeps everything in memory.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::geom::Offset;
use crate::render::PixelBuffer;

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Pointer moved.
    Move,
    /// A button went down.
    Down(MouseButton),
    /// A button went up.
    Up(MouseButton),
    /// A button was double clicked.
    DoubleClick(MouseButton),
    /// Wheel scrolled by the given number of notches, positive away from the user.
    Wheel(i32),
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub control: bool,
    /// Alt is held.
    pub alt: bool,
}

/// A pointer event in window or view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Event kind.
    pub kind: MouseEventKind,
    /// Pointer column.
    pub x: i32,
    /// Pointer row.
    pub y: i32,
    /// Modifier keys.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Event without modifiers.
    pub fn new(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Same event shifted by `-offset`.
    pub fn relative_to(&self, offset: Offset) -> Self {
        Self {
            x: self.x - offset.x,
            y: self.y - offset.y,
            ..*self
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Return or Enter.
    Enter,
    /// Backspace or Delete.
    Backspace,
    /// Escape.
    Escape,
    /// Any other key, by host key code.
    Other(u32),
}

/// Windowing and input service.
pub trait Display {
    /// Show `frame` on the surface `name`, creating the surface if needed.
    fn show(&mut self, name: &str, title: &str, frame: &PixelBuffer);

    /// Move the surface `name` on screen.
    fn move_to(&mut self, name: &str, offset: Offset);

    /// Close the surface `name`.
    fn destroy(&mut self, name: &str);

    /// Drain pointer events received by the surface `name`.
    fn poll_pointer(&mut self, name: &str) -> Vec<MouseEvent>;

    /// Wait for a key press. `None` for `timeout` waits indefinitely.
    fn wait_key(&mut self, timeout: Option<Duration>) -> Option<Key>;

    /// Block the calling thread.
    fn sleep(&mut self, duration: Duration);
}

/// In-memory display that records frames and replays queued input.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames: HashMap<String, PixelBuffer>,
    titles: HashMap<String, String>,
    positions: HashMap<String, Offset>,
    shown: usize,
    pointer: VecDeque<MouseEvent>,
    keys: VecDeque<Key>,
    slept: Duration,
}

impl HeadlessDisplay {
    /// Create an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pointer event for the next poll.
    pub fn push_pointer(&mut self, event: MouseEvent) {
        self.pointer.push_back(event);
    }

    /// Queue a key press.
    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Last frame shown on `name`.
    pub fn frame(&self, name: &str) -> Option<&PixelBuffer> {
        self.frames.get(name)
    }

    /// Title last shown on `name`.
    pub fn title(&self, name: &str) -> Option<&str> {
        self.titles.get(name).map(String::as_str)
    }

    /// Last position of `name`.
    pub fn position(&self, name: &str) -> Option<Offset> {
        self.positions.get(name).copied()
    }

    /// Number of frames shown so far.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Total time requested through [`Display::sleep`].
    pub fn slept(&self) -> Duration {
        self.slept
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, name: &str, title: &str, frame: &PixelBuffer) {
        self.frames.insert(name.to_string(), frame.clone());
        self.titles.insert(name.to_string(), title.to_string());
        self.shown += 1;
    }

    fn move_to(&mut self, name: &str, offset: Offset) {
        self.positions.insert(name.to_string(), offset);
    }

    fn destroy(&mut self, name: &str) {
        self.frames.remove(name);
        self.titles.remove(name);
    }

    fn poll_pointer(&mut self, _name: &str) -> Vec<MouseEvent> {
        self.pointer.drain(..).collect()
    }

    fn wait_key(&mut self, _timeout: Option<Duration>) -> Option<Key> {
        self.keys.pop_front()
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geom::Size;

    #[test]
    fn records_frames_and_input() {
        let mut display = HeadlessDisplay::new();
        let frame = PixelBuffer::new(Size::new(2, 2), Color::RED);
        display.show("w", "title", &frame);
        assert_eq!(display.frame("w"), Some(&frame));
        assert_eq!(display.title("w"), Some("title"));
        display.destroy("w");
        assert!(display.frame("w").is_none());
        assert_eq!(display.shown(), 1);

        display.push_pointer(MouseEvent::new(MouseEventKind::Move, 3, 4));
        assert_eq!(display.poll_pointer("w").len(), 1);
        assert!(display.poll_pointer("w").is_empty());

        display.push_key(Key::Char('q'));
        assert_eq!(display.wait_key(None), Some(Key::Char('q')));
        assert_eq!(display.wait_key(Some(Duration::from_millis(1))), None);
    }

    #[test]
    fn relative_events_keep_kind() {
        let event = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 30, 40);
        let local = event.relative_to(Offset::new(10, 15));
        assert_eq!((local.x, local.y), (20, 25));
        assert_eq!(local.kind, event.kind);
    }
}
