//! Line-oriented console operator

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::operator::{Notice, Operator, Prompt};

/// Operator reading answers line by line and printing notices
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn ask(&mut self, prompt: Prompt) -> Option<String> {
        if let Err(e) = write!(self.output, "{}", prompt.text()).and_then(|_| self.output.flush()) {
            warn!("Failed to show prompt: {}", e);
        }

        // Undecodable bytes become U+FFFD and are left to field validation
        let mut line = Vec::new();
        match self.input.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(String::from_utf8_lossy(&line).trim().to_string()),
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        if let Err(e) = writeln!(self.output, "{}", notice) {
            warn!("Failed to show notice: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_trimmed_lines_until_eof() {
        let input = io::Cursor::new("  1234 \r\nAlice Smith\n");
        let mut console = ConsoleOperator::new(input, Vec::new());

        assert_eq!(console.ask(Prompt::CardNumber).as_deref(), Some("1234"));
        assert_eq!(console.ask(Prompt::HolderName).as_deref(), Some("Alice Smith"));
        assert_eq!(console.ask(Prompt::Pin), None);
    }

    #[test]
    fn test_non_utf8_line_is_still_an_answer() {
        let input = io::Cursor::new(&b"Jos\xe9\n"[..]);
        let mut console = ConsoleOperator::new(input, Vec::new());

        assert_eq!(console.ask(Prompt::HolderName).as_deref(), Some("Jos\u{FFFD}"));
        assert_eq!(console.ask(Prompt::ExpiryDate), None);
    }

    #[test]
    fn test_writes_prompts_and_notices() {
        let mut console = ConsoleOperator::new(io::Cursor::new("9\n"), Vec::new());
        console.ask(Prompt::Pin);
        console.notify(&Notice::IncorrectPin { attempts_left: 2 });

        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "Enter PIN: Incorrect PIN. Attempts left: 2\n");
    }
}
