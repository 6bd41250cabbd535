//! Club fixtures ("matches") and their kickoff times.
//!
//! Dates and times are entered in club local time (UTC+09:00) exactly as the
//! fixture list prints them; [`Match::kickoff`] converts to UTC.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::MatchId;
use super::validation::{FieldErrorCode, bounded_text, field_error};
use super::Error;

/// Offset of the club's home time zone from UTC, in seconds.
pub const CLUB_UTC_OFFSET_SECONDS: i32 = 9 * 3600;
const TEXT_MAX: usize = 100;

/// Lifecycle of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Cancelled,
}

/// Kickoff time of day serialised as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KickoffTime(NaiveTime);

impl KickoffTime {
    /// Parse an `HH:MM` string.
    ///
    /// # Examples
    /// ```
    /// use giravent::domain::KickoffTime;
    ///
    /// assert_eq!(KickoffTime::parse("19:00").unwrap().to_string(), "19:00");
    /// assert!(KickoffTime::parse("7pm").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, Error> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| {
                field_error("time", FieldErrorCode::InvalidFormat, "time must be HH:MM")
            })
    }

    #[must_use]
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for KickoffTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl From<KickoffTime> for String {
    fn from(value: KickoffTime) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for KickoffTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Parse a `YYYY-MM-DD` match date.
pub fn parse_match_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        field_error("date", FieldErrorCode::InvalidFormat, "date must be YYYY-MM-DD")
    })
}

/// A fixture on the club calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[schema(value_type = String)]
    pub match_id: MatchId,
    #[schema(example = "Kataller Toyama")]
    pub opponent: String,
    #[schema(value_type = String, example = "2026-04-12")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "14:00")]
    pub time: KickoffTime,
    #[schema(example = "Mikuni World Stadium Kitakyushu")]
    pub venue: String,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Kickoff instant in UTC.
    #[must_use]
    pub fn kickoff(&self) -> DateTime<Utc> {
        kickoff_utc(self.date, self.time)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == MatchStatus::Cancelled
    }

    /// Fail with `409` when the fixture has been cancelled.
    pub fn ensure_active(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::conflict("match has been cancelled"));
        }
        Ok(())
    }
}

fn kickoff_utc(date: NaiveDate, time: KickoffTime) -> DateTime<Utc> {
    let local = date.and_time(time.as_naive());
    (local - Duration::seconds(i64::from(CLUB_UTC_OFFSET_SECONDS))).and_utc()
}

/// Validated input for a new fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDraft {
    pub opponent: String,
    pub date: NaiveDate,
    pub time: KickoffTime,
    pub venue: String,
}

impl MatchDraft {
    pub fn try_from_parts(
        opponent: &str,
        date: &str,
        time: &str,
        venue: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            opponent: bounded_text("opponent", opponent, 1, TEXT_MAX)?,
            date: parse_match_date(date)?,
            time: KickoffTime::parse(time)?,
            venue: bounded_text("venue", venue, 1, TEXT_MAX)?,
        })
    }

    /// Materialise the fixture as an active match.
    #[must_use]
    pub fn into_match(self, now: DateTime<Utc>) -> Match {
        Match {
            match_id: MatchId::random(),
            opponent: self.opponent,
            date: self.date,
            time: self.time,
            venue: self.venue,
            status: MatchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial fixture update applied by administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatch {
    pub opponent: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<KickoffTime>,
    pub venue: Option<String>,
    pub status: Option<MatchStatus>,
}

impl MatchPatch {
    pub fn try_from_parts(
        opponent: Option<&str>,
        date: Option<&str>,
        time: Option<&str>,
        venue: Option<&str>,
        status: Option<MatchStatus>,
    ) -> Result<Self, Error> {
        Ok(Self {
            opponent: opponent
                .map(|value| bounded_text("opponent", value, 1, TEXT_MAX))
                .transpose()?,
            date: date.map(parse_match_date).transpose()?,
            time: time.map(KickoffTime::parse).transpose()?,
            venue: venue
                .map(|value| bounded_text("venue", value, 1, TEXT_MAX))
                .transpose()?,
            status,
        })
    }

    pub fn apply(self, target: &mut Match, now: DateTime<Utc>) {
        if let Some(opponent) = self.opponent {
            target.opponent = opponent;
        }
        if let Some(date) = self.date {
            target.date = date;
        }
        if let Some(time) = self.time {
            target.time = time;
        }
        if let Some(venue) = self.venue {
            target.venue = venue;
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        target.updated_at = now;
    }
}

/// Order fixtures by kickoff, earliest first.
pub fn sort_by_kickoff(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        (a.date, a.time)
            .cmp(&(b.date, b.time))
            .then_with(|| a.match_id.cmp(&b.match_id))
    });
}
