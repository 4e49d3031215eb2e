use crate::dates::parse_korean_date;
use crate::domain::MenuPost;
use chrono::NaiveDate;

/// Where a target date stands relative to the scraped post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostResolution<'a> {
    /// A post's title resolves to exactly the target date.
    Found(&'a MenuPost),
    /// The target falls inside the range the board covers, but no post
    /// names it. A day the cafeteria did not serve.
    NoOperation,
    /// The target falls outside the range the board covers; nothing has
    /// been collected for it (yet).
    NoInformation,
}

/// Match `target` against the scraped posts, in site order.
///
/// Every successfully parsed title date is fed back as prior context for
/// the next title, so a post list crossing New Year keeps its years
/// straight. Titles without a recognizable date are routine notices and are
/// skipped. With no match, the target is classified against the inclusive
/// min/max range of all parsed dates.
pub fn resolve<'a>(
    posts: &'a [MenuPost],
    target: NaiveDate,
    today: NaiveDate,
) -> PostResolution<'a> {
    let mut prior: Vec<NaiveDate> = Vec::new();
    let mut matched: Option<&MenuPost> = None;
    let mut range: Option<(NaiveDate, NaiveDate)> = None;

    for post in posts {
        let Some(date) = parse_korean_date(&post.title, &prior, today) else {
            continue;
        };
        prior.insert(0, date);

        if matched.is_none() && date == target {
            matched = Some(post);
        }
        range = Some(match range {
            Some((min, max)) => (min.min(date), max.max(date)),
            None => (date, date),
        });
    }

    if let Some(post) = matched {
        return PostResolution::Found(post);
    }
    match range {
        Some((min, max)) if target >= min && target <= max => PostResolution::NoOperation,
        _ => PostResolution::NoInformation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn post(document_id: &str, title: &str) -> MenuPost {
        MenuPost::new(document_id, title, "2025.03.01")
    }

    fn march_posts() -> Vec<MenuPost> {
        vec![
            post("103", "3월 7일 식단 안내"),
            post("102", "3월 5일 식단 안내"),
            post("101", "3월 3일 식단 안내"),
        ]
    }

    #[test]
    fn test_matching_post_is_found() {
        let posts = march_posts();
        let today = d(2025, 3, 7);
        match resolve(&posts, d(2025, 3, 5), today) {
            PostResolution::Found(found) => assert_eq!(found.document_id, "102"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_gap_inside_range_is_no_operation() {
        let posts = march_posts();
        let today = d(2025, 3, 7);
        assert_eq!(
            resolve(&posts, d(2025, 3, 4), today),
            PostResolution::NoOperation
        );
    }

    #[test]
    fn test_date_outside_range_is_no_information() {
        let posts = march_posts();
        let today = d(2025, 3, 7);
        assert_eq!(
            resolve(&posts, d(2025, 4, 1), today),
            PostResolution::NoInformation
        );
        assert_eq!(
            resolve(&posts, d(2025, 2, 20), today),
            PostResolution::NoInformation
        );
    }

    #[test]
    fn test_empty_post_list_is_no_information() {
        assert_eq!(
            resolve(&[], d(2025, 3, 5), d(2025, 3, 7)),
            PostResolution::NoInformation
        );
    }

    #[test]
    fn test_posts_without_parsable_titles_are_no_information() {
        let posts = vec![post("201", "급식실 공지사항"), post("202", "설문 안내")];
        assert_eq!(
            resolve(&posts, d(2025, 3, 5), d(2025, 3, 7)),
            PostResolution::NoInformation
        );
    }

    #[test]
    fn test_undated_posts_are_skipped_not_matched() {
        let posts = vec![
            post("301", "급식실 공지사항"),
            post("302", "3월 5일 식단 안내"),
        ];
        let today = d(2025, 3, 7);
        match resolve(&posts, d(2025, 3, 5), today) {
            PostResolution::Found(found) => assert_eq!(found.document_id, "302"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_post_list_spanning_new_year_resolves_both_years() {
        // Site order is newest first; the prior-date chain carries the year
        // across the boundary in both directions.
        let posts = vec![
            post("403", "1월 3일 식단 안내"),
            post("402", "1월 2일 식단 안내"),
            post("401", "12월 31일 식단 안내"),
            post("400", "12월 30일 식단 안내"),
        ];
        let today = d(2024, 12, 30);

        match resolve(&posts, d(2025, 1, 2), today) {
            PostResolution::Found(found) => assert_eq!(found.document_id, "402"),
            other => panic!("expected Found, got {other:?}"),
        }
        match resolve(&posts, d(2024, 12, 31), today) {
            PostResolution::Found(found) => assert_eq!(found.document_id, "401"),
            other => panic!("expected Found, got {other:?}"),
        }
        // Jan 1 sits inside the covered range but has no post.
        assert_eq!(
            resolve(&posts, d(2025, 1, 1), today),
            PostResolution::NoOperation
        );
        assert_eq!(
            resolve(&posts, d(2024, 12, 25), today),
            PostResolution::NoInformation
        );
    }
}
