//! # Log Filters
//!
//! A [`LogFilter`] holds up to three independent regexes, one each for
//! record source, severity and message. Each field can be set, cleared or
//! left untouched on its own, so a caller can tighten the severity filter
//! without disturbing a source filter installed earlier.

use plugboard_bus::LogRecord;
use regex::Regex;

/// One field of a filter update.
#[derive(Debug, Clone)]
pub enum FilterUpdate {
    /// Leave the current regex as it is.
    Keep,
    /// Remove the current regex; the field matches everything again.
    Clear,
    /// Install a new regex for this field.
    Set(String),
}

impl FilterUpdate {
    fn apply(&self, slot: &mut Option<Regex>) -> Result<(), regex::Error> {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(pattern) => *slot = Some(Regex::new(pattern)?),
        }
        Ok(())
    }
}

/// Record filter over source, severity and message.
#[derive(Debug, Default)]
pub struct LogFilter {
    source: Option<Regex>,
    severity: Option<Regex>,
    message: Option<Regex>,
}

impl LogFilter {
    /// A filter that passes every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the three fields independently. On a regex compile error the
    /// filter is left unchanged up to the failing field.
    pub fn update(
        &mut self,
        source: FilterUpdate,
        severity: FilterUpdate,
        message: FilterUpdate,
    ) -> Result<(), regex::Error> {
        source.apply(&mut self.source)?;
        severity.apply(&mut self.severity)?;
        message.apply(&mut self.message)?;
        Ok(())
    }

    /// Whether `record` passes every installed regex.
    #[must_use]
    pub fn passes(&self, record: &LogRecord) -> bool {
        if let Some(re) = &self.source {
            if !re.is_match(&record.source) {
                return false;
            }
        }
        if let Some(re) = &self.severity {
            if !re.is_match(&record.severity) {
                return false;
            }
        }
        if let Some(re) = &self.message {
            if !re.is_match(&record.message) {
                return false;
            }
        }
        true
    }
}
