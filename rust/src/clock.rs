//! Wall-clock access and date-segment formatting.

use chrono::{DateTime, Local, Utc};

use crate::config::Settings;

/// Provides the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Format the date part of an identifier, or `None` when dates are disabled.
///
/// Produces `YYYYMMDD` (or `YYMMDD`), followed by the separator and `HHMMSS`
/// when timestamps are enabled.
pub fn format_date_segment(now: DateTime<Utc>, settings: &Settings) -> Option<String> {
    if !settings.include_date() {
        return None;
    }

    let date_fmt = if settings.use_two_digit_year() {
        "%y%m%d"
    } else {
        "%Y%m%d"
    };
    let fmt = if settings.use_timestamp() {
        format!("{date_fmt}{}%H%M%S", settings.separator())
    } else {
        date_fmt.to_string()
    };

    let formatted = if settings.use_local_time() {
        now.with_timezone(&Local).format(&fmt).to_string()
    } else {
        now.format(&fmt).to_string()
    };
    Some(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Delimiter, GeneratorConfig};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 7, 9, 5, 3).unwrap()
    }

    fn fmt(cfg: GeneratorConfig) -> Option<String> {
        format_date_segment(at(), &cfg.validate().unwrap())
    }

    #[test]
    fn date_only() {
        assert_eq!(fmt(GeneratorConfig::default()).as_deref(), Some("20260207"));
    }

    #[test]
    fn two_digit_year() {
        let cfg = GeneratorConfig::default().with_two_digit_year(true);
        assert_eq!(fmt(cfg).as_deref(), Some("260207"));
    }

    #[test]
    fn timestamp_uses_separator() {
        let cfg = GeneratorConfig::default().with_timestamp(true);
        assert_eq!(fmt(cfg).as_deref(), Some("20260207-090503"));

        let cfg = GeneratorConfig::default()
            .with_timestamp(true)
            .with_two_digit_year(true)
            .with_delimiter(Some(Delimiter::Pipe));
        assert_eq!(fmt(cfg).as_deref(), Some("260207|090503"));
    }

    #[test]
    fn timestamp_without_delimiter_is_contiguous() {
        let cfg = GeneratorConfig::default()
            .with_timestamp(true)
            .with_delimiter(None);
        assert_eq!(fmt(cfg).as_deref(), Some("20260207090503"));
    }

    #[test]
    fn disabled_date_yields_nothing() {
        let cfg = GeneratorConfig::default()
            .with_date(false)
            .with_timestamp(true);
        assert_eq!(fmt(cfg), None);
    }

    #[test]
    fn local_time_follows_local_zone() {
        let cfg = GeneratorConfig::default()
            .with_timestamp(true)
            .with_local_time(true);
        let expected = at().with_timezone(&Local).format("%Y%m%d-%H%M%S").to_string();
        assert_eq!(fmt(cfg), Some(expected));
    }

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = FixedClock(at());
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), at());
    }
}
