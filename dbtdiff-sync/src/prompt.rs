//! Operator confirmation for the "rebase onto reference?" question.

use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Ask a yes/no question; anything but an explicit yes is a no.
    fn confirm(&self, question: &str) -> bool;
}

/// Reads one line from stdin; only `y` / `Y` count as yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{question} (y/N): ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }
}

/// Fixed answer, used for `--yes` and non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, question: &str) -> bool {
        tracing::info!("{question} -> {}", if self.0 { "yes" } else { "no" });
        self.0
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_single_y_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("Y"));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
    }
}
