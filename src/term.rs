//! Terminal front end
//!
//! Draws frames with crossterm and maps key presses to game commands.
//! Each grid cell is two characters wide so the board looks square.

use std::io::{self, Write};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::driver::{Frame, Renderer};
use crate::sim::{Direction, EndReason};

const SNAKE_BODY: &str = "██";
const FOOD: &str = "()";
const FLOOR_DARK: &str = "  ";
const FLOOR_LIGHT: &str = "··";

/// A request coming from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Reset,
    Quit,
}

/// Arrow keys or WASD steer, `r` resets, `q` / Esc / Ctrl+C quit.
pub fn map_key(ev: &KeyEvent) -> Option<Command> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(ev.code, KeyCode::Char('c')).then_some(Command::Quit);
    }

    match ev.code {
        KeyCode::Up | KeyCode::Char('w') => Some(Command::Steer(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') => Some(Command::Steer(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') => Some(Command::Steer(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::Steer(Direction::Right)),
        KeyCode::Char('r') | KeyCode::Enter => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "^^",
        Direction::Down => "vv",
        Direction::Left => "<<",
        Direction::Right => ">>",
    }
}

/// Board rows as plain text, including the border
pub fn board_lines(frame: &Frame<'_>) -> Vec<String> {
    let grid = frame.grid;
    let columns = grid.columns().max(0) as usize;
    let rows = grid.rows().max(0) as usize;
    let mut cells: Vec<Vec<&str>> = (0..rows)
        .map(|row| {
            (0..columns)
                .map(|col| if (row + col) % 2 == 0 { FLOOR_DARK } else { FLOOR_LIGHT })
                .collect()
        })
        .collect();

    let mut put = |x: i32, y: i32, glyph: &'static str| {
        if grid.contains(crate::sim::Cell::new(x, y)) {
            cells[(y / grid.unit) as usize][(x / grid.unit) as usize] = glyph;
        }
    };
    put(frame.food.x, frame.food.y, FOOD);
    for cell in frame.snake.segments().skip(1) {
        put(cell.x, cell.y, SNAKE_BODY);
    }
    let head = frame.snake.head();
    put(head.x, head.y, head_glyph(frame.velocity.direction()));

    let border = format!("+{}+", "-".repeat(columns * 2));
    let mut lines = Vec::with_capacity(rows + 2);
    lines.push(border.clone());
    lines.extend(cells.iter().map(|row| format!("|{}|", row.concat())));
    lines.push(border);
    lines
}

/// Terminal size needed for a board of `columns` x `rows`, plus the status line.
///
/// `None` when the board cannot fit any terminal.
pub fn required_size(columns: i32, rows: i32) -> Option<(u16, u16)> {
    let width = columns.checked_mul(2)?.checked_add(2)?;
    let height = rows.checked_add(3)?;
    Some((u16::try_from(width).ok()?, u16::try_from(height).ok()?))
}

/// Draws frames into a terminal (or any writer)
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Switch to the alternate screen in raw mode
    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()
    }

    /// Undo `setup`
    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)
    }

    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for (y, line) in board_lines(frame).iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                SetForegroundColor(Color::Green),
                Print(line),
                ResetColor
            )?;
        }
        let status_row = frame.grid.rows() as u16 + 2;
        queue!(
            self.out,
            cursor::MoveTo(0, status_row),
            Print(format!("Score: {}   Best: {}", frame.score, frame.high_score.max(frame.score)))
        )?;
        Ok(())
    }

    fn draw_banner(&mut self, frame: &Frame<'_>, lines: &[&str]) -> io::Result<()> {
        let Some((width, height)) = required_size(frame.grid.columns(), frame.grid.rows()) else {
            return Ok(());
        };
        let top = (height / 2).saturating_sub(lines.len() as u16 / 2 + 1);
        for (i, line) in lines.iter().enumerate() {
            let len = line.chars().count() as u16;
            let left = (width / 2).saturating_sub(len / 2);
            queue!(
                self.out,
                cursor::MoveTo(left, top + i as u16),
                SetForegroundColor(Color::White),
                Print(line),
                ResetColor
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) {
        let result = self.draw(frame).and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::warn!("Render error: {}", e);
        }
    }

    fn game_over(&mut self, frame: &Frame<'_>, reason: EndReason) {
        let title = match reason {
            EndReason::BoardFull => " BOARD FULL - YOU WIN! ",
            EndReason::Boundary | EndReason::SelfCollision => " GAME OVER! ",
        };
        let score = format!(" Score: {} ", frame.score);
        let result = self
            .draw(frame)
            .and_then(|_| self.draw_banner(frame, &[title, score.as_str(), " r: restart   q: quit "]))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::warn!("Render error: {}", e);
        }
    }
}
