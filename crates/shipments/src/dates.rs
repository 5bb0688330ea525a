//! Lenient parsing of the date-like strings carriers attach to shipments.
//!
//! Dates feed two decisions only, recency cutoff and sort order, so parsing
//! is deliberately forgiving: anything unparseable becomes the Unix epoch and
//! sorts last / falls outside every cutoff window.
//!
//! Accepted forms:
//!
//! - RFC 3339 with offset: `2024-05-30T10:15:00+02:00`, `2024-05-30T08:15:00Z`
//! - ISO without colon in the offset: `2024-05-30T10:15:00+0200`
//! - naive date-time, `T` or space separated, seconds and fraction optional
//!   (wall-clock time in the viewer's offset)
//! - date only: `2024-05-30` (midnight UTC)
//! - integer epoch milliseconds: `1717056900000`
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::types::ShipmentRecord;

/// Reference date for missing or malformed values.
pub const EPOCH: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses one date-like string with naive date-times taken as UTC.
///
/// ```rust
/// use shipments::parse_date_like;
///
/// let parsed = parse_date_like("2024-01-01").unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2024-01-01T00:00:00+00:00");
/// assert!(parse_date_like("morgen").is_none());
/// ```
pub fn parse_date_like(raw: &str) -> Option<DateTime<Utc>> {
    parse_date_like_in(raw, &Utc.fix())
}

/// Parses one date-like string, `None` when nothing matches.
///
/// Date-times without an offset are wall-clock times in `local`. Date-only
/// strings stay midnight UTC whatever `local` is.
///
/// ```rust
/// use chrono::FixedOffset;
/// use shipments::parse_date_like_in;
///
/// let cest = FixedOffset::east_opt(2 * 3600).unwrap();
/// let parsed = parse_date_like_in("2024-05-30T10:15:00", &cest).unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2024-05-30T08:15:00+00:00");
/// ```
pub fn parse_date_like_in(raw: &str, local: &FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return local
                .from_local_datetime(&parsed)
                .single()
                .map(|instant| instant.with_timezone(&Utc));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    if raw.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }

    None
}

/// Resolves the first present candidate. A present but malformed value does
/// not fall through to later candidates; it resolves to [`EPOCH`].
pub fn resolve_date(candidates: &[Option<&str>]) -> DateTime<Utc> {
    resolve_date_in(candidates, &Utc.fix())
}

/// [`resolve_date`] with naive date-times read in `local`.
pub fn resolve_date_in(candidates: &[Option<&str>], local: &FixedOffset) -> DateTime<Utc> {
    candidates
        .iter()
        .copied()
        .flatten()
        .next()
        .and_then(|raw| parse_date_like_in(raw, local))
        .unwrap_or(EPOCH)
}

impl ShipmentRecord {
    /// Date checked against the recency cutoff:
    /// `delivery_date` → `planned_date` → epoch.
    pub fn cutoff_date(&self) -> DateTime<Utc> {
        self.cutoff_date_in(&Utc.fix())
    }

    /// [`cutoff_date`](Self::cutoff_date) with naive date-times read in `local`.
    pub fn cutoff_date_in(&self, local: &FixedOffset) -> DateTime<Utc> {
        resolve_date_in(
            &[self.delivery_date.as_deref(), self.planned_date.as_deref()],
            local,
        )
    }

    /// Date the tab views sort on:
    /// `delivery_date` → `planned_date` → `expected_datetime` → epoch.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.sort_date_in(&Utc.fix())
    }

    /// [`sort_date`](Self::sort_date) with naive date-times read in `local`.
    pub fn sort_date_in(&self, local: &FixedOffset) -> DateTime<Utc> {
        resolve_date_in(
            &[
                self.delivery_date.as_deref(),
                self.planned_date.as_deref(),
                self.expected_datetime.as_deref(),
            ],
            local,
        )
    }

    /// Raw value shown as the parcel's date label:
    /// `delivery_date` → `planned_date` → `planned_to`.
    pub fn label_date(&self) -> Option<&str> {
        self.delivery_date
            .as_deref()
            .or(self.planned_date.as_deref())
            .or(self.planned_to.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(y, m, d, h, min, 0).single() else {
            panic!("invalid fixture timestamp");
        };
        ts
    }

    #[test]
    fn parses_accepted_forms() {
        let cases = [
            ("2024-05-30T10:15:00+02:00", utc(2024, 5, 30, 8, 15)),
            ("2024-05-30T08:15:00Z", utc(2024, 5, 30, 8, 15)),
            ("2024-05-30T10:15:00+0200", utc(2024, 5, 30, 8, 15)),
            ("2024-05-30T08:15:00", utc(2024, 5, 30, 8, 15)),
            (
                "2024-05-30 08:15:00.250",
                utc(2024, 5, 30, 8, 15) + chrono::Duration::milliseconds(250),
            ),
            ("2024-05-30 08:15", utc(2024, 5, 30, 8, 15)),
            (" 2024-05-30 ", utc(2024, 5, 30, 0, 0)),
            ("1717056900000", utc(2024, 5, 30, 8, 15)),
        ];

        for (raw, expected) in cases {
            assert_eq!(parse_date_like(raw), Some(expected), "input {raw:?}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "   ", "morgen", "2024-13-45", "30-05-2024", "12:00"] {
            assert_eq!(parse_date_like(raw), None, "input {raw:?}");
        }
    }

    #[test]
    fn malformed_first_candidate_does_not_fall_through() {
        let resolved = resolve_date(&[Some("binnenkort"), Some("2024-05-30")]);
        assert_eq!(resolved, EPOCH);

        let resolved = resolve_date(&[None, Some("2024-05-30")]);
        assert_eq!(resolved, utc(2024, 5, 30, 0, 0));

        assert_eq!(resolve_date(&[None, None]), EPOCH);
    }

    #[test]
    fn record_date_precedence() {
        let mut record = ShipmentRecord::new("K");
        record.expected_datetime = Some("2024-05-03".into());
        record.planned_to = Some("2024-05-04T18:00:00".into());
        assert_eq!(record.cutoff_date(), EPOCH);
        assert_eq!(record.sort_date(), utc(2024, 5, 3, 0, 0));
        assert_eq!(record.label_date(), Some("2024-05-04T18:00:00"));

        record.planned_date = Some("2024-05-02".into());
        assert_eq!(record.cutoff_date(), utc(2024, 5, 2, 0, 0));
        assert_eq!(record.sort_date(), utc(2024, 5, 2, 0, 0));
        assert_eq!(record.label_date(), Some("2024-05-02"));

        record.delivery_date = Some("2024-05-01T09:30:00Z".into());
        assert_eq!(record.cutoff_date(), utc(2024, 5, 1, 9, 30));
        assert_eq!(record.sort_date(), utc(2024, 5, 1, 9, 30));
        assert_eq!(record.label_date(), Some("2024-05-01T09:30:00Z"));
    }

    #[test]
    fn naive_times_are_wall_clock_in_local_offset() {
        let cest = FixedOffset::east_opt(2 * 3600).expect("valid offset");

        assert_eq!(
            parse_date_like_in("2024-05-30T10:15:00", &cest),
            Some(utc(2024, 5, 30, 8, 15))
        );
        assert_eq!(
            parse_date_like_in("2024-05-30 10:15", &cest),
            Some(utc(2024, 5, 30, 8, 15))
        );
        // Explicit offsets and date-only values ignore the local offset.
        assert_eq!(
            parse_date_like_in("2024-05-30T10:15:00Z", &cest),
            Some(utc(2024, 5, 30, 10, 15))
        );
        assert_eq!(
            parse_date_like_in("2024-05-30", &cest),
            Some(utc(2024, 5, 30, 0, 0))
        );
    }

    #[test]
    fn record_dates_follow_local_offset() {
        let cest = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let mut record = ShipmentRecord::new("K");
        record.delivery_date = Some("2024-05-30T01:00:00".into());

        assert_eq!(record.cutoff_date(), utc(2024, 5, 30, 1, 0));
        assert_eq!(record.cutoff_date_in(&cest), utc(2024, 5, 29, 23, 0));
        assert_eq!(record.sort_date_in(&cest), utc(2024, 5, 29, 23, 0));
    }
}
