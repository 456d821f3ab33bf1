//! GPUI integration for pixel_plot.
//!
//! [`GpuiDisplay`] implements [`Display`] by storing frames in shared state,
//! and [`GpuiFrameView`] paints one stored surface and queues its pointer
//! input for [`Window::tick`](crate::Window::tick).

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use gpui::prelude::*;
use gpui::{
    BorderStyle, Bounds, Corners, Edges, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels,
    Point, ScrollWheelEvent, Window, canvas, div, point, px, quad, size,
};

use crate::color::Color;
use crate::display::{Display, Key, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::geom::Offset;
use crate::render::PixelBuffer;

#[derive(Debug, Default)]
struct Surface {
    title: String,
    frame: PixelBuffer,
    offset: Offset,
    origin: (f32, f32),
}

#[derive(Debug, Default)]
struct Shared {
    surfaces: HashMap<String, Surface>,
    pointer: HashMap<String, VecDeque<MouseEvent>>,
    keys: VecDeque<Key>,
}

/// Display backed by GPUI views.
///
/// Clones share the same surfaces. Frames become visible once the matching
/// [`GpuiFrameView`] is notified. Waiting is left to the GPUI executor:
/// [`Display::wait_key`] never blocks and [`Display::sleep`] returns at once.
#[derive(Debug, Clone, Default)]
pub struct GpuiDisplay {
    shared: Arc<RwLock<Shared>>,
}

impl GpuiDisplay {
    /// Create a display with no surfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press, e.g. from an application key binding.
    pub fn push_key(&self, key: Key) {
        if let Ok(mut shared) = self.shared.write() {
            shared.keys.push_back(key);
        }
    }

    /// Title of surface `name`.
    pub fn title(&self, name: &str) -> Option<String> {
        let shared = self.shared.read().ok()?;
        let surface = shared.surfaces.get(name)?;
        Some(surface.title.clone())
    }

    fn frame(&self, name: &str) -> Option<PixelBuffer> {
        let shared = self.shared.read().ok()?;
        let surface = shared.surfaces.get(name)?;
        Some(surface.frame.clone())
    }

    fn set_origin(&self, name: &str, origin: Point<Pixels>) {
        if let Ok(mut shared) = self.shared.write() {
            if let Some(surface) = shared.surfaces.get_mut(name) {
                surface.origin = (f32::from(origin.x), f32::from(origin.y));
            }
        }
    }

    fn origin(&self, name: &str) -> (f32, f32) {
        let Ok(shared) = self.shared.read() else {
            return (0.0, 0.0);
        };
        match shared.surfaces.get(name) {
            Some(surface) => surface.origin,
            None => (0.0, 0.0),
        }
    }

    fn push_pointer(&self, name: &str, event: MouseEvent) {
        if let Ok(mut shared) = self.shared.write() {
            let queue = shared.pointer.entry(name.to_string()).or_default();
            queue.push_back(event);
        }
    }
}

impl Display for GpuiDisplay {
    fn show(&mut self, name: &str, title: &str, frame: &PixelBuffer) {
        if let Ok(mut shared) = self.shared.write() {
            let surface = shared.surfaces.entry(name.to_string()).or_default();
            surface.title = title.to_string();
            surface.frame = frame.clone();
        }
    }

    fn move_to(&mut self, name: &str, offset: Offset) {
        if let Ok(mut shared) = self.shared.write() {
            shared.surfaces.entry(name.to_string()).or_default().offset = offset;
        }
    }

    fn destroy(&mut self, name: &str) {
        if let Ok(mut shared) = self.shared.write() {
            shared.surfaces.remove(name);
            shared.pointer.remove(name);
        }
    }

    fn poll_pointer(&mut self, name: &str) -> Vec<MouseEvent> {
        match self.shared.write() {
            Ok(mut shared) => shared
                .pointer
                .get_mut(name)
                .map(|queue| queue.drain(..).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn wait_key(&mut self, _timeout: Option<Duration>) -> Option<Key> {
        self.shared.write().ok()?.keys.pop_front()
    }

    fn sleep(&mut self, _duration: Duration) {}
}

/// A GPUI view that paints one surface of a [`GpuiDisplay`].
pub struct GpuiFrameView {
    display: GpuiDisplay,
    surface: String,
}

impl GpuiFrameView {
    /// Paint surface `surface`, normally [`Window::name`](crate::Window::name).
    pub fn new(display: GpuiDisplay, surface: impl Into<String>) -> Self {
        Self {
            display,
            surface: surface.into(),
        }
    }

    fn pointer(&self, kind: MouseEventKind, position: Point<Pixels>, modifiers: &gpui::Modifiers) {
        let (x, y) = local_position(position, self.display.origin(&self.surface));
        let event = MouseEvent {
            kind,
            x,
            y,
            modifiers: Modifiers {
                shift: modifiers.shift,
                control: modifiers.control,
                alt: modifiers.alt,
            },
        };
        self.display.push_pointer(&self.surface, event);
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent) {
        if let Some(button) = button(ev.button) {
            let kind = if ev.click_count >= 2 {
                MouseEventKind::DoubleClick(button)
            } else {
                MouseEventKind::Down(button)
            };
            self.pointer(kind, ev.position, &ev.modifiers);
        }
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent) {
        if let Some(button) = button(ev.button) {
            self.pointer(MouseEventKind::Up(button), ev.position, &ev.modifiers);
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent) {
        self.pointer(MouseEventKind::Move, ev.position, &ev.modifiers);
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent) {
        let delta = f32::from(ev.delta.pixel_delta(px(20.0)).y);
        if delta != 0.0 {
            let notches = if delta > 0.0 { 1 } else { -1 };
            self.pointer(MouseEventKind::Wheel(notches), ev.position, &ev.modifiers);
        }
    }
}

impl Render for GpuiFrameView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let frame = self.display.frame(&self.surface);
        let (display, surface) = (self.display.clone(), self.surface.clone());

        div()
            .size_full()
            .bg(gpui::Hsla::from(to_rgba(Color::GRAY)))
            .child(
                canvas(
                    move |_, _, _| frame,
                    move |bounds, frame, window, _| {
                        display.set_origin(&surface, bounds.origin);
                        if let Some(frame) = frame {
                            paint_buffer(&frame, bounds.origin, window);
                        }
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                gpui::MouseButton::Left,
                cx.listener(|this, ev, _, _| this.on_mouse_down(ev)),
            )
            .on_mouse_down(
                gpui::MouseButton::Right,
                cx.listener(|this, ev, _, _| this.on_mouse_down(ev)),
            )
            .on_mouse_down(
                gpui::MouseButton::Middle,
                cx.listener(|this, ev, _, _| this.on_mouse_down(ev)),
            )
            .on_mouse_up(
                gpui::MouseButton::Left,
                cx.listener(|this, ev, _, _| this.on_mouse_up(ev)),
            )
            .on_mouse_up(
                gpui::MouseButton::Right,
                cx.listener(|this, ev, _, _| this.on_mouse_up(ev)),
            )
            .on_mouse_up(
                gpui::MouseButton::Middle,
                cx.listener(|this, ev, _, _| this.on_mouse_up(ev)),
            )
            .on_mouse_move(cx.listener(|this, ev, _, _| this.on_mouse_move(ev)))
            .on_scroll_wheel(cx.listener(|this, ev, _, _| this.on_scroll(ev)))
    }
}

/// Window position relative to the painted frame's top-left corner.
fn local_position(position: Point<Pixels>, origin: (f32, f32)) -> (i32, i32) {
    (
        (f32::from(position.x) - origin.0) as i32,
        (f32::from(position.y) - origin.1) as i32,
    )
}

fn button(button: gpui::MouseButton) -> Option<MouseButton> {
    match button {
        gpui::MouseButton::Left => Some(MouseButton::Left),
        gpui::MouseButton::Right => Some(MouseButton::Right),
        gpui::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Paint each row as runs of equal color, one quad per run.
fn paint_buffer(frame: &PixelBuffer, origin: Point<Pixels>, window: &mut Window) {
    let (width, height) = (frame.width() as i32, frame.height() as i32);
    for y in 0..height {
        let mut x = 0;
        while x < width {
            let Some(color) = frame.get(x, y) else {
                break;
            };
            let start = x;
            while x < width && frame.get(x, y) == Some(color) {
                x += 1;
            }
            let bounds = Bounds::new(
                point(origin.x + px(start as f32), origin.y + px(y as f32)),
                size(px((x - start) as f32), px(1.0)),
            );
            window.paint_quad(quad(
                bounds,
                Corners::all(px(0.0)),
                to_rgba(color),
                Edges::all(px(0.0)),
                to_rgba(color),
                BorderStyle::default(),
            ));
        }
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: f32::from(color.r) / 255.0,
        g: f32::from(color.g) / 255.0,
        b: f32::from(color.b) / 255.0,
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size;

    #[test]
    fn clones_share_surfaces_and_input() {
        let mut display = GpuiDisplay::new();
        let view = GpuiFrameView::new(display.clone(), "w");
        display.show("w", "title", &PixelBuffer::new(Size::new(2, 2), Color::RED));
        assert_eq!(view.display.title("w").as_deref(), Some("title"));
        let size = view.display.frame("w").map(|frame| frame.size());
        assert_eq!(size, Some(Size::new(2, 2)));

        let event = MouseEvent::new(MouseEventKind::Move, 1, 1);
        view.display.push_pointer("w", event);
        assert_eq!(display.poll_pointer("w").len(), 1);
        assert!(display.poll_pointer("other").is_empty());

        view.display.push_key(Key::Enter);
        assert_eq!(display.wait_key(None), Some(Key::Enter));
    }

    #[test]
    fn pointer_is_relative_to_painted_origin() {
        let mut display = GpuiDisplay::new();
        let view = GpuiFrameView::new(display.clone(), "w");
        let modifiers = gpui::Modifiers::default();
        view.pointer(MouseEventKind::Move, point(px(15.0), px(27.5)), &modifiers);

        display.show("w", "title", &PixelBuffer::new(Size::new(2, 2), Color::RED));
        display.set_origin("w", point(px(10.0), px(20.0)));
        view.pointer(MouseEventKind::Move, point(px(15.0), px(27.5)), &modifiers);

        let events = display.poll_pointer("w");
        assert_eq!((events[0].x, events[0].y), (15, 27));
        assert_eq!((events[1].x, events[1].y), (5, 7));
        let local = local_position(point(px(3.0), px(4.0)), (10.0, 20.0));
        assert_eq!(local, (-7, -16));
    }
}
