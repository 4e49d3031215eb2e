use crate::domain::{MealSection, MealSlot};

/// Items near the end of a meal line naming one of these belong to the
/// grab-and-go "간편식" offering, not the cooked menu.
pub const SIMPLE_MEAL_KEYWORDS: [&str; 4] = ["샌드위치", "죽", "닭가슴살", "선식"];

/// A plain "샐러드" is a simple item; the self-serve "샐러드바" is part of
/// the regular line.
pub const SALAD_KEYWORD: &str = "샐러드";
pub const SALAD_BAR_KEYWORD: &str = "샐러드바";

/// Breakfast posts list up to five simple items at the tail; other meals
/// at most three.
pub const TAIL_WINDOW_BREAKFAST: usize = 5;
pub const TAIL_WINDOW_DEFAULT: usize = 3;

/// Tunable knobs for simple-meal classification.
#[derive(Debug, Clone)]
pub struct SegmentPolicy {
    pub tail_window_breakfast: usize,
    pub tail_window_default: usize,
    pub simple_keywords: Vec<String>,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        Self {
            tail_window_breakfast: TAIL_WINDOW_BREAKFAST,
            tail_window_default: TAIL_WINDOW_DEFAULT,
            simple_keywords: SIMPLE_MEAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl SegmentPolicy {
    fn tail_window(&self, slot: MealSlot) -> usize {
        match slot {
            MealSlot::Breakfast => self.tail_window_breakfast,
            _ => self.tail_window_default,
        }
    }

    fn is_simple(&self, item: &str) -> bool {
        if self.simple_keywords.iter().any(|k| item.contains(k.as_str())) {
            return true;
        }
        item.contains(SALAD_KEYWORD) && !item.contains(SALAD_BAR_KEYWORD)
    }
}

/// Split one raw meal line into items. `/` separates items, except inside
/// parentheses where it separates alternatives within a single item, so
/// "김치찌개(두부/고기)" stays whole. Items are trimmed and empties dropped.
pub fn split_items(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            '/' if depth == 0 => {
                let item = current.trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    items
}

/// Segment a raw meal line with the default policy.
pub fn segment(raw: &str, slot: MealSlot) -> MealSection {
    segment_with(&SegmentPolicy::default(), raw, slot)
}

/// Segment a raw meal line and classify its tail-window items.
///
/// Only the last few items of a line are candidates for the simple-meal
/// list; a keyword hit earlier in the line is a coincidence (e.g. a cooked
/// dish with a matching ingredient) and stays regular. Taking the simple
/// items out slides the window onto earlier items, so classification is
/// re-applied to what remains until nothing moves; re-segmenting the joined
/// `regular` output therefore reproduces it unchanged. Relative ordering is
/// preserved in both output lists.
pub fn segment_with(policy: &SegmentPolicy, raw: &str, slot: MealSlot) -> MealSection {
    let window = policy.tail_window(slot);
    let mut regular: Vec<(usize, String)> = split_items(raw).into_iter().enumerate().collect();
    let mut simple: Vec<(usize, String)> = Vec::new();

    loop {
        let tail_start = regular.len().saturating_sub(window);
        let mut kept = Vec::with_capacity(regular.len());
        let mut moved = Vec::new();
        for (position, (index, item)) in regular.into_iter().enumerate() {
            if position >= tail_start && policy.is_simple(&item) {
                moved.push((index, item));
            } else {
                kept.push((index, item));
            }
        }
        regular = kept;
        if moved.is_empty() {
            break;
        }
        simple.extend(moved);
    }

    simple.sort_by_key(|(index, _)| *index);
    MealSection {
        regular: regular.into_iter().map(|(_, item)| item).collect(),
        simple: simple.into_iter().map(|(_, item)| item).collect(),
        image: None,
    }
}

/// Pull one meal's raw text out of a post body. The site writes each meal
/// on its own line, opened by "*조식:" / "*중식:" / "*석식:".
pub fn extract_meal_text(content: &str, slot: MealSlot) -> Option<String> {
    let prefix = format!("*{}:", slot.marker());
    content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(&prefix).map(|rest| rest.trim().to_string()))
}
