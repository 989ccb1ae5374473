use std::io::{self, Write};

/// Asks the user a question and reads back a single line.
pub trait Prompt {
    /// Returns the raw answer, trailing newline included.
    fn ask(&self, question: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, question: &str) -> io::Result<String> {
        anstream::print!("{question}");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(answer)
    }
}
