// Public API
pub mod dates;
pub mod domain;
pub mod error;
pub mod ports;
pub mod resolve;
pub mod segment;
pub mod service;

// Re-export commonly used types
pub use dates::{format_date_key, kst_today, parse_date_key, parse_korean_date};
pub use domain::{
    CacheEntry, DailyMenu, MealDocument, MealImages, MealSection, MealSlot, MenuOutcome, MenuPost,
};
pub use error::MenuError;
pub use ports::{MealRepository, MenuSource, TtlStore};
pub use resolve::{PostResolution, resolve};
pub use segment::{SegmentPolicy, extract_meal_text, segment, segment_with, split_items};
pub use service::{MenuService, RefreshScope, RefreshSummary};
