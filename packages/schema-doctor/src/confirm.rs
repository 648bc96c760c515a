use std::io::{self, BufRead, Write};

/// Operator decision on a destructive-adjacent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

impl Confirmation {
    /// Case-insensitive `yes`/`y` accepts; anything else, including empty
    /// input, declines.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Confirmation::Accepted,
            _ => Confirmation::Declined,
        }
    }
}

/// Source of operator confirmations, injected so the repair flow can be
/// exercised without a terminal.
pub trait ConfirmationSource {
    fn confirm(&mut self, question: &str) -> io::Result<Confirmation>;
}

/// Blocking prompt on the process stdin/stdout.
pub struct StdinConfirmation;

impl ConfirmationSource for StdinConfirmation {
    fn confirm(&mut self, question: &str) -> io::Result<Confirmation> {
        let mut stdout = io::stdout();
        write!(stdout, "{question} ")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(Confirmation::parse(&line))
    }
}
