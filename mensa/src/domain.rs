use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One bulletin-board post as listed by the scraping collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPost {
    pub document_id: String,
    pub title: String,
    /// The board's own date column. Display metadata only: it records when
    /// the post was written, not which day the menu covers.
    pub raw_date_label: String,
}

impl MenuPost {
    pub fn new(
        document_id: impl Into<String>,
        title: impl Into<String>,
        raw_date_label: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            raw_date_label: raw_date_label.into(),
        }
    }
}

/// The three daily meals. Each knows the marker the site uses to open its
/// section in a post body ("*조식:" and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn marker(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "조식",
            MealSlot::Lunch => "중식",
            MealSlot::Dinner => "석식",
        }
    }
}

/// One meal's parsed menu. `simple` is the grab-and-go subset, split out of
/// the segmented item list with its original ordering preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSection {
    pub regular: Vec<String>,
    pub simple: Vec<String>,
    pub image: Option<String>,
}

/// A full day of parsed meals, the unit stored in cache and repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMenu {
    pub breakfast: MealSection,
    pub lunch: MealSection,
    pub dinner: MealSection,
}

impl DailyMenu {
    pub fn section(&self, slot: MealSlot) -> &MealSection {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn section_mut(&mut self, slot: MealSlot) -> &mut MealSection {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }
}

/// Raw post body handed over by the scraping collaborator for one
/// `document_id`: the text content plus whatever meal photos it found.
#[derive(Debug, Clone, Default)]
pub struct MealDocument {
    pub content: String,
    pub images: MealImages,
}

#[derive(Debug, Clone, Default)]
pub struct MealImages {
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
}

impl MealImages {
    pub fn for_slot(&self, slot: MealSlot) -> Option<&str> {
        match slot {
            MealSlot::Breakfast => self.breakfast.as_deref(),
            MealSlot::Lunch => self.lunch.as_deref(),
            MealSlot::Dinner => self.dinner.as_deref(),
        }
    }
}

/// Why a lookup did or did not produce a menu.
///
/// `NoOperation` and `NoInformation` are first-class answers, not errors:
/// the first means the board covers the requested date but no menu was
/// posted for it (weekend, holiday), the second means the date falls
/// outside everything scraped so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Found(DailyMenu),
    NoOperation,
    NoInformation,
}

/// A cached value together with its expiry bookkeeping. Stores persist the
/// whole entry so a lookup can always re-check the deadline, wherever the
/// entry has been sitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        let stored_at = Utc::now();
        let ttl = TimeDelta::milliseconds(ttl.as_millis().min(i64::MAX as u128) as i64);
        let expires_at = stored_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            value,
            stored_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_expires_after_stored() {
        let entry = CacheEntry::new("menu", Duration::from_secs(3600));
        assert!(entry.expires_at > entry.stored_at);
        assert!(!entry.is_expired(Utc::now()));
        assert!(entry.is_expired(entry.expires_at + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_cache_entry_huge_ttl_saturates() {
        let entry = CacheEntry::new("menu", Duration::from_secs(u64::MAX));
        assert!(entry.expires_at > entry.stored_at);
        assert!(!entry.is_expired(Utc::now()));
    }

    #[test]
    fn test_daily_menu_sections_line_up_with_slots() {
        let mut menu = DailyMenu::default();
        menu.section_mut(MealSlot::Lunch).regular.push("밥".to_string());
        assert_eq!(menu.lunch.regular, vec!["밥".to_string()]);
        assert!(menu.section(MealSlot::Breakfast).regular.is_empty());
    }
}
