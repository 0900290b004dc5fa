use crate::AppResult;
use console::Term;
use std::sync::Mutex;

/// Sink for user-facing notices.
///
/// Notices go straight to the terminal or into an in-memory transcript.
#[derive(Debug, Clone)]
pub struct AppReporter<'a> {
    inner: AppReporterInner<'a>,
}

impl AppReporter<'_> {
    pub fn report<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        match &self.inner {
            AppReporterInner::Term(term) => Ok(term.write_line(message.as_ref())?),
            AppReporterInner::Transcript(lines) => {
                lines
                    .lock()
                    .map_err(|e| crate::errors::AppError::SystemError {
                        message: format!("Transcript lock poisoned: {e}"),
                    })?
                    .extend(message.as_ref().lines().map(|line| line.to_string()));
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
enum AppReporterInner<'a> {
    Term(&'a Term),
    Transcript(&'a Mutex<Vec<String>>),
}

impl<'a> From<&'a Term> for AppReporter<'a> {
    fn from(term: &'a Term) -> Self {
        AppReporter {
            inner: AppReporterInner::Term(term),
        }
    }
}

impl<'a> From<&'a Mutex<Vec<String>>> for AppReporter<'a> {
    fn from(lines: &'a Mutex<Vec<String>>) -> Self {
        AppReporter {
            inner: AppReporterInner::Transcript(lines),
        }
    }
}
