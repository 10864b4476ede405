//! Console output with status glyphs.
use colored::*;
use std::{
    fmt::Display,
    io::{self, Write},
};

/// Width of the `=` rules around the header and summary.
pub const RULE_WIDTH: usize = 40;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Writes report lines and flushes after each so progress shows up while
/// the hardware is busy.
pub struct Printer {
    out: Box<dyn Write>,
}

impl Printer {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn line(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", msg)?;
        self.out.flush()
    }

    pub fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    pub fn pass(&mut self, msg: impl Display) -> io::Result<()> {
        self.line(format!("{} {}", "✓".green(), msg))
    }

    pub fn warn(&mut self, msg: impl Display) -> io::Result<()> {
        self.line(format!("{}  {}", "⚠️".yellow(), msg))
    }

    pub fn fail(&mut self, msg: impl Display) -> io::Result<()> {
        self.line(format!("{} {}", "❌".red(), msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn glyphs_prefix_messages() {
        colored::control::set_override(false);
        let buf = Shared::default();
        let mut printer = Printer::new(Box::new(buf.clone()));
        printer.pass("ok").unwrap();
        printer.warn("hm").unwrap();
        printer.fail("no").unwrap();
        let out = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert_eq!(out, "✓ ok\n⚠️  hm\n❌ no\n");
    }
}
