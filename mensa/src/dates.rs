use crate::error::MenuError;
use chrono::{Datelike, NaiveDate, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Month gap beyond which a candidate date is assumed to sit across a year
/// boundary from its reference point.
pub const YEAR_WRAP_THRESHOLD_MONTHS: i32 = 6;

/// Half-width of the window a resolved date must land in around "now";
/// anything further out has its year snapped back by one.
pub const PLAUSIBLE_WINDOW_DAYS: i64 = 183;

static KOREAN_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)월\s*(\d+)일").expect("month/day pattern compiles"));

static DATE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key pattern compiles"));

/// Wall-clock date in Korea Standard Time (UTC+9). The bulletin board and
/// its readers live in KST, so every "today" decision uses this clock.
pub fn kst_today() -> NaiveDate {
    (Utc::now() + TimeDelta::hours(9)).date_naive()
}

/// Strict `YYYY-MM-DD` boundary parsing. The shape is checked before chrono
/// gets involved, so `2025-3-4` and `2025/03/04` are rejected rather than
/// leniently accepted.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, MenuError> {
    if !DATE_KEY.is_match(raw) {
        return Err(MenuError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| MenuError::InvalidDate(raw.to_string()))
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Recover an absolute date from a post title like "3월 14일 식단 안내".
///
/// Titles never carry a year, so one has to be inferred. With prior context
/// (dates of already-resolved posts, most recent first) the candidate month
/// is compared against the most recent prior date; a gap wider than
/// [`YEAR_WRAP_THRESHOLD_MONTHS`] rolls the year forward or backward, which
/// keeps a post list that spans New Year from collapsing onto one year.
/// Without context the same rule runs against `today`. A title with no
/// month/day pattern, or one naming an impossible calendar date, is `None`.
pub fn parse_korean_date(title: &str, prior: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    let caps = KOREAN_MONTH_DAY.captures(title)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;

    let (ref_year, ref_month) = match prior.first() {
        Some(recent) => (recent.year(), recent.month()),
        None => (today.year(), today.month()),
    };

    let gap = ref_month as i32 - month as i32;
    let year = if gap > YEAR_WRAP_THRESHOLD_MONTHS {
        ref_year + 1
    } else if gap < -YEAR_WRAP_THRESHOLD_MONTHS {
        ref_year - 1
    } else {
        ref_year
    };

    let candidate = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(clamp_to_window(candidate, today))
}

/// Snap a date landing implausibly far from `today` back by one year. The
/// board only ever covers a few weeks around the present.
fn clamp_to_window(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let offset = (date - today).num_days();
    let snapped_year = if offset > PLAUSIBLE_WINDOW_DAYS {
        date.year() - 1
    } else if offset < -PLAUSIBLE_WINDOW_DAYS {
        date.year() + 1
    } else {
        return date;
    };
    // Feb 29 may not exist in the snapped year; keep the original then.
    NaiveDate::from_ymd_opt(snapped_year, date.month(), date.day()).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_parses_month_and_day_from_title() {
        let today = d(2025, 3, 10);
        assert_eq!(
            parse_korean_date("3월 14일 식단 안내", &[], today),
            Some(d(2025, 3, 14))
        );
        // Spacing between the markers varies across posts.
        assert_eq!(
            parse_korean_date("3월14일 식단", &[], today),
            Some(d(2025, 3, 14))
        );
    }

    #[test]
    fn test_same_inputs_same_output() {
        let today = d(2025, 3, 10);
        let first = parse_korean_date("3월 14일 식단", &[], today);
        let second = parse_korean_date("3월 14일 식단", &[], today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_without_date_is_none() {
        let today = d(2025, 3, 10);
        assert_eq!(parse_korean_date("식단 안내", &[], today), None);
        assert_eq!(parse_korean_date("급식실 공지사항", &[], today), None);
    }

    #[test]
    fn test_impossible_calendar_date_is_none() {
        let today = d(2025, 3, 10);
        assert_eq!(parse_korean_date("2월 30일 식단", &[], today), None);
        assert_eq!(parse_korean_date("13월 1일 식단", &[], today), None);
    }

    #[test]
    fn test_prior_context_rolls_year_forward_across_new_year() {
        let prior = vec![d(2024, 12, 28)];
        let today = d(2024, 12, 28);
        assert_eq!(
            parse_korean_date("1월 2일 식단", &prior, today),
            Some(d(2025, 1, 2))
        );
    }

    #[test]
    fn test_prior_context_rolls_year_backward_across_new_year() {
        let prior = vec![d(2025, 1, 3)];
        let today = d(2025, 1, 3);
        assert_eq!(
            parse_korean_date("12월 30일 식단", &prior, today),
            Some(d(2024, 12, 30))
        );
    }

    #[test]
    fn test_prior_context_inside_threshold_inherits_year() {
        let prior = vec![d(2025, 3, 1)];
        let today = d(2025, 3, 1);
        assert_eq!(
            parse_korean_date("5월 2일 식단", &prior, today),
            Some(d(2025, 5, 2))
        );
        assert_eq!(
            parse_korean_date("2월 27일 식단", &prior, today),
            Some(d(2025, 2, 27))
        );
    }

    #[test]
    fn test_most_recent_prior_date_wins() {
        // Older context entries would pick the wrong year; only the head
        // of the list is consulted.
        let prior = vec![d(2025, 1, 2), d(2024, 12, 30)];
        let today = d(2025, 1, 2);
        assert_eq!(
            parse_korean_date("1월 3일 식단", &prior, today),
            Some(d(2025, 1, 3))
        );
    }

    #[test]
    fn test_december_clock_reads_january_as_next_year() {
        let today = d(2024, 12, 20);
        assert_eq!(
            parse_korean_date("1월 2일 식단", &[], today),
            Some(d(2025, 1, 2))
        );
    }

    #[test]
    fn test_january_clock_reads_december_as_previous_year() {
        let today = d(2025, 1, 5);
        assert_eq!(
            parse_korean_date("12월 30일 식단", &[], today),
            Some(d(2024, 12, 30))
        );
    }

    #[test]
    fn test_implausibly_far_dates_snap_back_into_window() {
        // A six-month forward gap passes the wrap rule but fails the
        // plausibility window, so the year snaps back.
        let today = d(2025, 3, 10);
        assert_eq!(
            parse_korean_date("9월 20일 식단", &[], today),
            Some(d(2024, 9, 20))
        );
    }

    #[test]
    fn test_date_key_accepts_exact_shape_only() {
        assert_eq!(parse_date_key("2025-03-04").unwrap(), d(2025, 3, 4));
        for bad in ["2025-3-4", "2025/03/04", "20250304", "2025-03-04x", ""] {
            assert!(matches!(
                parse_date_key(bad),
                Err(MenuError::InvalidDate(_))
            ));
        }
        // Right shape, impossible date.
        assert!(matches!(
            parse_date_key("2025-02-30"),
            Err(MenuError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_date_key_round_trips() {
        let date = d(2025, 3, 4);
        assert_eq!(parse_date_key(&format_date_key(date)).unwrap(), date);
    }
}
