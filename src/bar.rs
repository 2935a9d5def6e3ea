//! Bar
//!
//! The availability gate and the log of when it was open.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to the availability gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarError {
    /// Ordering was attempted while the bar is closed.
    #[error("the bar is closed{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Closed {
        /// Closing message shown to customers, if any
        message: Option<String>,
    },

    /// The bar was opened while an opening was still in progress.
    #[error("the bar is already open since {0}")]
    AlreadyOpen(Timestamp),

    /// The bar was closed while no opening was in progress.
    #[error("the bar is not open")]
    NotOpen,

    /// The closing time precedes the opening time.
    #[error("cannot close at {end}, the bar opened at {begin}")]
    ClosedBeforeOpened {
        /// Opening time
        begin: Timestamp,

        /// Rejected closing time
        end: Timestamp,
    },
}

/// Current state of the availability gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarStatus {
    /// Whether new orders may be created
    pub is_open: bool,

    /// Message shown to customers while closed
    #[serde(default, alias = "closed_message")]
    pub closing_message: Option<String>,

    /// When the current opening started, only given to staff
    #[serde(default, with = "crate::time::option")]
    pub open_since: Option<Timestamp>,
}

impl BarStatus {
    /// An open bar.
    pub fn open() -> Self {
        Self {
            is_open: true,
            ..Self::default()
        }
    }

    /// A closed bar with an optional closing message.
    pub fn closed(message: Option<String>) -> Self {
        Self {
            is_open: false,
            closing_message: message,
            open_since: None,
        }
    }

    /// Checks whether ordering affordances may be offered.
    ///
    /// # Errors
    ///
    /// Returns [`BarError::Closed`] with the closing message while the bar is closed.
    pub fn admit(&self) -> Result<(), BarError> {
        if self.is_open {
            Ok(())
        } else {
            Err(BarError::Closed {
                message: self.closing_message.clone(),
            })
        }
    }
}

/// One interval during which the bar was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarOpening {
    /// Opening time
    #[serde(with = "crate::time")]
    pub begin: Timestamp,

    /// Closing time, absent while still open
    #[serde(default, with = "crate::time::option")]
    pub end: Option<Timestamp>,
}

impl BarOpening {
    /// Whether this opening is still in progress.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Append-only log of bar openings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarLog {
    openings: Vec<BarOpening>,
}

impl BarLog {
    /// Builds a log from recorded openings, oldest first.
    pub fn from_openings(openings: Vec<BarOpening>) -> Self {
        Self { openings }
    }

    /// Recorded openings, oldest first.
    pub fn openings(&self) -> &[BarOpening] {
        &self.openings
    }

    /// The opening in progress, if any.
    pub fn current(&self) -> Option<&BarOpening> {
        self.openings.last().filter(|opening| opening.is_open())
    }

    /// Status derived from the log.
    pub fn status(&self, closing_message: Option<String>) -> BarStatus {
        match self.current() {
            Some(opening) => BarStatus {
                is_open: true,
                closing_message,
                open_since: Some(opening.begin),
            },
            None => BarStatus::closed(closing_message),
        }
    }

    /// Opens the bar.
    ///
    /// # Errors
    ///
    /// Returns [`BarError::AlreadyOpen`] if an opening is already in progress.
    pub fn open(&mut self, now: Timestamp) -> Result<&BarOpening, BarError> {
        if let Some(current) = self.current() {
            return Err(BarError::AlreadyOpen(current.begin));
        }

        self.openings.push(BarOpening {
            begin: now,
            end: None,
        });

        self.openings.last().ok_or(BarError::NotOpen)
    }

    /// Closes the opening in progress.
    ///
    /// # Errors
    ///
    /// - [`BarError::NotOpen`]: no opening is in progress.
    /// - [`BarError::ClosedBeforeOpened`]: `now` precedes the opening time.
    pub fn close(&mut self, now: Timestamp) -> Result<&BarOpening, BarError> {
        let opening = self
            .openings
            .last_mut()
            .filter(|opening| opening.is_open())
            .ok_or(BarError::NotOpen)?;

        if now < opening.begin {
            return Err(BarError::ClosedBeforeOpened {
                begin: opening.begin,
                end: now,
            });
        }

        opening.end = Some(now);

        Ok(opening)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn closed_bar_refuses_admission_with_message() {
        let status = BarStatus::closed(Some("Back at 18:00".to_string()));

        let result = status.admit();

        assert_eq!(
            result,
            Err(BarError::Closed {
                message: Some("Back at 18:00".to_string())
            })
        );
        assert_eq!(
            result.map_err(|error| error.to_string()),
            Err("the bar is closed: Back at 18:00".to_string())
        );
    }

    #[test]
    fn open_bar_admits() {
        assert_eq!(BarStatus::open().admit(), Ok(()));
    }

    #[test]
    fn customer_status_reads_closed_message_alias() -> TestResult {
        let status: BarStatus =
            serde_json::from_str(r#"{"is_open": false, "closed_message": "Sold out"}"#)?;

        assert!(!status.is_open);
        assert_eq!(status.closing_message.as_deref(), Some("Sold out"));
        assert_eq!(status.open_since, None);

        Ok(())
    }

    #[test]
    fn staff_status_reads_open_since() -> TestResult {
        let status: BarStatus = serde_json::from_str(
            r#"{"is_open": true, "open_since": 1700000000000, "closing_message": null}"#,
        )?;

        assert_eq!(
            status.open_since,
            Some(Timestamp::from_millisecond(1_700_000_000_000)?)
        );

        Ok(())
    }

    #[test]
    fn log_appends_and_closes_openings() -> TestResult {
        let mut log = BarLog::default();
        let begin = Timestamp::from_second(1_000)?;
        let end = Timestamp::from_second(2_000)?;

        log.open(begin)?;

        assert_eq!(log.status(None).open_since, Some(begin));
        assert_eq!(log.open(end), Err(BarError::AlreadyOpen(begin)));

        log.close(end)?;

        assert_eq!(
            log.openings(),
            &[BarOpening {
                begin,
                end: Some(end)
            }]
        );
        assert!(!log.status(None).is_open);

        log.open(end)?;

        assert_eq!(log.openings().len(), 2);

        Ok(())
    }

    #[test]
    fn closing_requires_an_opening_in_progress() -> TestResult {
        let mut log = BarLog::default();

        assert_eq!(log.close(Timestamp::UNIX_EPOCH), Err(BarError::NotOpen));

        let begin = Timestamp::from_second(1_000)?;
        log.open(begin)?;

        assert_eq!(
            log.close(Timestamp::UNIX_EPOCH),
            Err(BarError::ClosedBeforeOpened {
                begin,
                end: Timestamp::UNIX_EPOCH
            })
        );
        assert!(log.current().is_some());

        Ok(())
    }

    #[test]
    fn openings_parse_from_milliseconds() -> TestResult {
        let log: BarLog = serde_json::from_str(r#"[{"begin": 0, "end": 60000}, {"begin": 120000}]"#)?;

        assert_eq!(log.openings().len(), 2);
        assert_eq!(log.current().map(|opening| opening.begin), Some(Timestamp::from_second(120)?));

        Ok(())
    }
}
