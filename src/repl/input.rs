//! Reading commands from the terminal.
//!
//! A command is a single key press read in raw mode. `:` switches to line
//! mode so a command can take arguments, e.g. `:j project = AB`.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Run the command bound to `key` with `args` (possibly empty).
    Command { key: char, args: String },
    /// Show the command table.
    Help,
    /// Leave the REPL.
    Quit,
    /// Nothing to do (Enter, arrow keys, an empty line).
    Nothing,
}

/// Source of operator input.
pub trait InputSource {
    /// Show `prompt` and wait for the next input.
    fn next_input(&mut self, prompt: &str) -> io::Result<Input>;
}

/// Classified key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPress {
    Char(char),
    Interrupt,
    Other,
}

fn classify_key(key: &KeyEvent) -> KeyPress {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyPress::Interrupt
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => KeyPress::Other,
        KeyCode::Char(c) => KeyPress::Char(c),
        _ => KeyPress::Other,
    }
}

/// Map a single key to an input.
pub fn input_for_key(key: char) -> Input {
    match key {
        'q' => Input::Quit,
        '?' => Input::Help,
        key => Input::Command {
            key,
            args: String::new(),
        },
    }
}

/// Parse a line-mode entry: the first character is the key, the rest are
/// its arguments.
pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(key) = chars.next() else {
        return Input::Nothing;
    };
    let args = chars.as_str().trim();

    match input_for_key(key) {
        Input::Command { key, .. } => Input::Command {
            key,
            args: args.to_string(),
        },
        other => other,
    }
}

/// Leaves raw mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads single key presses from the terminal.
#[derive(Debug, Default)]
pub struct KeyReader;

impl KeyReader {
    /// Create a key reader.
    pub fn new() -> Self {
        Self
    }

    /// Block until a key is pressed.
    fn read_key(&self) -> io::Result<KeyPress> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(classify_key(&key));
                }
            }
        }
    }
}

impl InputSource for KeyReader {
    fn next_input(&mut self, prompt: &str) -> io::Result<Input> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        match self.read_key()? {
            KeyPress::Char(':') => {
                write!(stdout, ":")?;
                stdout.flush()?;
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(Input::Quit);
                }
                Ok(parse_line(&line))
            }
            KeyPress::Char(c) => {
                writeln!(stdout, "{}", c)?;
                Ok(input_for_key(c))
            }
            KeyPress::Interrupt => {
                writeln!(stdout)?;
                Ok(Input::Quit)
            }
            KeyPress::Other => {
                writeln!(stdout)?;
                Ok(Input::Nothing)
            }
        }
    }
}
