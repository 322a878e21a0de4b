//! Display sink: the one channel through which the console talks to the user.

/// Renders a line of text to the end user.
///
/// Both the console loop and the network client's receive path report through
/// this trait, so tests can capture everything the user would see.
pub trait DisplaySink: Send + Sync {
    /// Print one line of text.
    fn show(&self, text: &str);
}

/// Writes each line to standard output.
pub struct StdoutDisplay;

impl DisplaySink for StdoutDisplay {
    fn show(&self, text: &str) {
        println!("{text}");
    }
}
