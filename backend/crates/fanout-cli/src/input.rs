/// Typing this ends the session
pub const QUIT_COMMAND: &str = "quit";

/// What to do with one line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Quit,
    Skip,
    Send(String),
}

/// Classify a raw input line. Surrounding whitespace is trimmed.
pub fn parse_line(line: &str) -> InputLine {
    match line.trim() {
        "" => InputLine::Skip,
        QUIT_COMMAND => InputLine::Quit,
        text => InputLine::Send(text.to_string()),
    }
}
