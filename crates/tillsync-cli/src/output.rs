//! CLI output helpers
//!
//! Human output prints checkmarked progress lines; JSON output stays quiet
//! until the final document so it can be piped into other tools.

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Prints progress and results in the selected format
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// A completed step
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Human {
            println!("\u{2713} {message}");
        }
    }

    /// A progress note, suppressed in JSON mode
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Human {
            println!("  {message}");
        }
    }

    /// A non-fatal problem
    pub fn warn(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{26a0} Warning: {message}"),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"level": "warning", "message": message}));
            }
        }
    }

    /// A failure
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{2717} Error: {message}"),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"level": "error", "message": message}));
            }
        }
    }

    /// The final result document, printed only in JSON mode
    pub fn print_json(&self, value: &serde_json::Value) {
        if self.format == OutputFormat::Json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_default()
            );
        }
    }
}
