//! Console sink for previews.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Bytes per printed row before a line wraps.
pub const PRINT_WIDTH: usize = 100;

#[derive(Clone)]
enum Sink {
    Stdout,
    Memory(Rc<RefCell<Vec<u8>>>),
}

/// Where previews are printed. Clones share the same sink.
#[derive(Clone)]
pub struct Console {
    sink: Sink,
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sink {
            Sink::Stdout => f.write_str("Console(stdout)"),
            Sink::Memory(_) => f.write_str("Console(memory)"),
        }
    }
}

impl Console {
    /// Prints to standard output.
    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Collects output in memory; read it back with [`Console::contents`].
    pub fn memory() -> Self {
        Self {
            sink: Sink::Memory(Rc::default()),
        }
    }

    /// Everything printed so far to a memory console.
    pub fn contents(&self) -> String {
        match &self.sink {
            Sink::Stdout => String::new(),
            Sink::Memory(buffer) => String::from_utf8_lossy(&buffer.borrow()).into_owned(),
        }
    }

    /// Writes `text` unchanged.
    pub fn write(&self, text: &str) -> io::Result<()> {
        match &self.sink {
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()
            }
            Sink::Memory(buffer) => buffer.borrow_mut().write_all(text.as_bytes()),
        }
    }

    /// Prints `code` with line numbers between two rules.
    pub fn print_code(&self, code: &str) -> io::Result<()> {
        self.write(&format_code(code, PRINT_WIDTH))
    }
}

/// Formats `code` for the console.
///
/// Line numbers are right aligned. A line longer than `width` bytes continues
/// on indented rows without a number.
pub fn format_code(code: &str, width: usize) -> String {
    let mut lines: Vec<&str> = code.split('\n').collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }

    let digits = lines.len().to_string().len();
    let rule = "=".repeat(width + digits + 2);
    let mut out = format!("\nPrint content to stdout\n{rule}\n");

    for (index, line) in lines.iter().enumerate() {
        for (row, segment) in split_bytes(line, width).into_iter().enumerate() {
            if row == 0 {
                out.push_str(&format!("{:>digits$}. {segment}\n", index + 1));
            } else {
                out.push_str(&format!("{:digits$}  {segment}\n", ""));
            }
        }
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Splits `line` into pieces of at most `width` bytes on char boundaries.
fn split_bytes(line: &str, width: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (offset, ch) in line.char_indices() {
        if used + ch.len_utf8() > width && used > 0 {
            pieces.push(&line[start..offset]);
            start = offset;
            used = 0;
        }
        used += ch.len_utf8();
    }
    pieces.push(&line[start..]);
    pieces
}
