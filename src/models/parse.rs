// Result of parsing one tool's text output.

/// A line the parser could not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// 1-based line number in the raw output (header included).
    pub line: usize,
    pub text: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    pub failures: Vec<ParseFailure>,
}

impl<T> Default for ParseReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> ParseReport<T> {
    pub(crate) fn skip(&mut self, line: usize, text: &str, reason: &'static str) {
        self.failures.push(ParseFailure {
            line,
            text: text.to_string(),
            reason,
        });
    }

    /// Logs skipped lines at debug level and hands back the records.
    pub fn into_records(self, operation: &'static str) -> Vec<T> {
        if !self.failures.is_empty() {
            tracing::debug!(
                operation,
                skipped = self.failures.len(),
                first = ?self.failures.first(),
                "skipped malformed output lines"
            );
        }
        self.records
    }
}
