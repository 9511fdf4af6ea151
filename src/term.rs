use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyEvent, KeyEventKind, read, poll};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::error::GameError;

/// Terminal columns used to draw one board cell.
const CELL_WIDTH: u16 = 2;

const BOARD_COLOR: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const TEXT_COLOR: Color = Color::Rgb { r: 255, g: 255, b: 255 };

pub trait Screen {
    fn setup(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
}

pub trait KeySource {
    /// Keys already waiting, without blocking.
    fn pending_keys(&mut self) -> io::Result<Vec<KeyEvent>>;
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

/// Sets `screen` up. If that fails part way, it is restored before returning.
pub fn enter<S: Screen + ?Sized>(screen: &mut S) -> io::Result<()> {
    match screen.setup() {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = screen.restore();
            Err(e)
        }
    }
}

/// Blocks for a key pressed after this call. Keys typed earlier are dropped.
pub fn wait_for_fresh_key<K: KeySource + ?Sized>(keys: &mut K) -> io::Result<KeyEvent> {
    keys.pending_keys()?;
    keys.next_key()
}

pub struct TermManager {
    stdout: Stdout,
    cols: u16,
    rows: u16,
    // Top-left corner of the border
    origin: (u16, u16),
}

impl TermManager {
    /// Fails if the terminal cannot fit a `cols` x `rows` board plus its border.
    pub fn new(cols: u16, rows: u16) -> Result<Self, GameError> {
        let (width, height) = terminal::size()?;
        let need_width = cols * CELL_WIDTH + 2;
        let need_height = rows + 2;

        if width < need_width || height < need_height {
            return Err(GameError::TerminalTooSmall { width, height, need_width, need_height });
        }

        let origin = ((width - need_width) / 2, (height - need_height) / 2);
        Ok(TermManager { stdout: stdout(), cols, rows, origin })
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind != KeyEventKind::Release {
                    return Ok(ev);
                }
            }
        }
    }

    /// Every key event since the last call, releases included, without waiting.
    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn draw_borders(&mut self) -> io::Result<()> {
        let (left, top) = self.origin;
        let width = self.cols * CELL_WIDTH + 2;
        let end_y = top + self.rows + 1;

        queue!(self.stdout, style::ResetColor)?;
        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(left + x, top), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(left + x, end_y), style::Print(ch))?;
        }

        for y in top + 1..end_y {
            queue!(self.stdout, cursor::MoveTo(left, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(left + width - 1, y), style::Print('|'))?;
        }

        Ok(())
    }

    pub fn clear_board(&mut self) -> io::Result<()> {
        let blank = " ".repeat(usize::from(self.cols * CELL_WIDTH));
        queue!(self.stdout, style::SetBackgroundColor(BOARD_COLOR))?;

        for row in 0..self.rows {
            let (x, y) = self.cell_origin(0, row);
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(&blank))?;
        }

        queue!(self.stdout, style::ResetColor)
    }

    pub fn paint_cell(&mut self, col: u16, row: u16, color: Color) -> io::Result<()> {
        if col >= self.cols || row >= self.rows {
            return Ok(());
        }

        let (x, y) = self.cell_origin(col, row);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            style::SetBackgroundColor(color),
            style::Print("  "),
            style::ResetColor
        )
    }

    /// Writes `text` over the top border.
    pub fn print_status(&mut self, text: &str) -> io::Result<()> {
        let (left, top) = self.origin;
        queue!(
            self.stdout,
            cursor::MoveTo(left + 2, top),
            style::SetForegroundColor(TEXT_COLOR),
            style::Print(format!(" {} ", text)),
            style::ResetColor
        )
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let msg_height = lines.len() as u16 + 2;
        let msg_width = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) as u16 + 2;
        let (left, top) = self.origin;
        let center = (left + self.cols * CELL_WIDTH / 2 + 1, top + self.rows / 2 + 1);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        let blank = " ".repeat(usize::from(msg_width));
        queue!(self.stdout, style::ResetColor)?;
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1), style::Print(&blank))?;
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1 + msg_height - 1), style::Print(&blank))?;

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn cell_origin(&self, col: u16, row: u16) -> (u16, u16) {
        (self.origin.0 + 1 + col * CELL_WIDTH, self.origin.1 + 1 + row)
    }
}

impl Screen for TermManager {
    fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
    }

    fn restore(&mut self) -> io::Result<()> {
        let raw = terminal::disable_raw_mode();
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        raw
    }
}

impl KeySource for TermManager {
    fn pending_keys(&mut self) -> io::Result<Vec<KeyEvent>> {
        self.read_key_events_queue()
    }

    fn next_key(&mut self) -> io::Result<KeyEvent> {
        self.read_key_blocking()
    }
}
