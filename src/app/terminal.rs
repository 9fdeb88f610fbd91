use std::io::{self, IsTerminal};

/// Answers whether rendered output lands on an interactive terminal.
pub trait OutputTarget {
    fn is_interactive(&self) -> bool;
}

pub struct Stdout;

impl OutputTarget for Stdout {
    fn is_interactive(&self) -> bool {
        io::stdout().is_terminal()
    }
}
