/// A fatal problem on one trace line.
#[derive(Debug, Clone)]
pub struct EncoderError {
    pub error_message: String,
    pub line_number: usize,
    pub column: usize,
    pub width: usize,
}

impl EncoderError {
    pub fn new(error_message: String, line_number: usize, column: usize, width: usize) -> Self {
        Self {
            error_message,
            line_number,
            column,
            width,
        }
    }
}

impl std::fmt::Display for EncoderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error_message)
    }
}

impl std::error::Error for EncoderError {}

/// A trace line dropped because its mnemonic is not in the supported
/// subset. Non-fatal; the line consumes no instruction address.
#[derive(Debug, Clone)]
pub struct SkippedLine {
    pub line_number: usize,
    pub mnemonic: String,
}

impl std::fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: unknown instruction '{}', skipped",
            self.line_number, self.mnemonic
        )
    }
}
