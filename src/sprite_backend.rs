//! Crossterm backend that draws one kitty-protocol image after each frame.
//!
//! Components record where the sprite goes while rendering; the backend
//! writes the escape sequence once ratatui has flushed the cell diff.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

const DELETE_ALL_IMAGES: &str = "\x1b_Ga=d,d=a\x1b\\";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpritePlacement {
    pub x: u16,
    pub y: u16,
    pub sequence: String,
}

pub type SpriteSlot = Arc<Mutex<Option<SpritePlacement>>>;

static SLOT: OnceLock<SpriteSlot> = OnceLock::new();

pub fn sprite_slot() -> SpriteSlot {
    SLOT.get_or_init(|| Arc::new(Mutex::new(None))).clone()
}

pub fn place_sprite(x: u16, y: u16, sequence: String) {
    if let Ok(mut slot) = sprite_slot().lock() {
        *slot = Some(SpritePlacement { x, y, sequence });
    }
}

pub fn clear_sprite() {
    if let Ok(mut slot) = sprite_slot().lock() {
        *slot = None;
    }
}

#[derive(Debug, Clone)]
pub struct SpriteBackend<W: Write> {
    inner: CrosstermBackend<W>,
    slot: SpriteSlot,
    had_sprite: bool,
}

impl<W: Write> SpriteBackend<W> {
    pub fn new(writer: W, slot: SpriteSlot) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            slot,
            had_sprite: false,
        }
    }
}

impl<W: Write> Backend for SpriteBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let placement = self
            .slot
            .lock()
            .map_err(|_| io::Error::other("sprite slot poisoned"))?
            .clone();
        if self.had_sprite {
            queue!(self.inner, Print(DELETE_ALL_IMAGES))?;
        }
        match placement {
            Some(placement) => {
                queue!(
                    self.inner,
                    MoveTo(placement.x, placement.y),
                    Print(placement.sequence)
                )?;
                self.had_sprite = true;
            }
            None => self.had_sprite = false,
        }
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for SpriteBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}
