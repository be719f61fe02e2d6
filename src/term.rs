use crate::input::{InputSource, Key};
use crate::snake::{Direction, Position};
use crate::TermInt;
use std::{io::{Stdout, Write, stdout}, time::{Duration, Instant}};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};

/// Something a frame can be drawn on.
pub trait Canvas {
    fn clear(&mut self) -> crossterm::Result<()>;
    fn print_at(&mut self, pos: Position, ch: char, color: Color) -> crossterm::Result<()>;
    fn print_text(&mut self, pos: Position, text: &str) -> crossterm::Result<()>;
    fn flush(&mut self) -> crossterm::Result<()>;
}

pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self, width: TermInt, height: TermInt) -> crossterm::Result<()> {
        let (cols, rows) = terminal::size()?;
        if cols < width || rows < height {
            log::warn!("Terminal is {}x{}, the board needs {}x{}", cols, rows, width, height);
        }

        execute!(self.stdout, EnterAlternateScreen, terminal::SetSize(width, height))?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }
}

impl Canvas for TermManager {
    fn clear(&mut self) -> crossterm::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn print_at(&mut self, pos: Position, ch: char, color: Color) -> crossterm::Result<()> {
        queue!(self.stdout,
            cursor::MoveTo(pos.x as TermInt, pos.y as TermInt),
            style::SetForegroundColor(color),
            style::Print(ch))
    }

    fn print_text(&mut self, pos: Position, text: &str) -> crossterm::Result<()> {
        queue!(self.stdout,
            cursor::MoveTo(pos.x as TermInt, pos.y as TermInt),
            style::ResetColor,
            style::Print(text))
    }

    fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl InputSource for TermManager {
    fn poll_key(&mut self, timeout: Duration) -> crossterm::Result<Option<Key>> {
        let started = Instant::now();

        loop {
            let left = match timeout.checked_sub(started.elapsed()) {
                Some(left) => left,
                None => return Ok(None),
            };

            if !poll(left)? {
                return Ok(None);
            }

            // Anything that isn't a game key is skipped without ending the wait
            if let Event::Key(ev) = read()? {
                if let Some(key) = map_key(&ev) {
                    return Ok(Some(key));
                }
            }
        }
    }

    fn wait_any_key(&mut self) -> crossterm::Result<()> {
        loop {
            if let Event::Key(_) = read()? {
                return Ok(());
            }
        }
    }
}

fn map_key(ev: &KeyEvent) -> Option<Key> {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL } => Some(Key::Interrupt),
        KeyEvent { code, .. } => match code {
            KeyCode::Up => Some(Key::Arrow(Direction::Up)),
            KeyCode::Down => Some(Key::Arrow(Direction::Down)),
            KeyCode::Left => Some(Key::Arrow(Direction::Left)),
            KeyCode::Right => Some(Key::Arrow(Direction::Right)),
            _ => None,
        }
    }
}
