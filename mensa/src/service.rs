use crate::dates::{self, format_date_key, parse_date_key};
use crate::domain::{DailyMenu, MealDocument, MealSlot, MenuOutcome, MenuPost};
use crate::error::MenuError;
use crate::ports::{MealRepository, MenuSource, TtlStore};
use crate::resolve::{PostResolution, resolve};
use crate::segment::{extract_meal_text, segment};
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Today's menu may still change while its photo is being uploaded, so the
/// entry stays short-lived.
pub const TODAY_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Past and future days are stable once scraped.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on any single upstream call.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Which posts a bulk refresh walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    Today,
    All,
}

/// Tally of one bulk refresh run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Orchestrates menu lookups: cache first, then the durable repository,
/// then a live resolve against the scraped board. All collaborators are
/// injected; the service owns no global state.
pub struct MenuService {
    cache: Arc<dyn TtlStore<DailyMenu>>,
    source: Arc<dyn MenuSource>,
    repository: Option<Arc<dyn MealRepository>>,
    today_ttl: Duration,
    default_ttl: Duration,
    fetch_timeout: Duration,
}

impl MenuService {
    pub fn new(cache: Arc<dyn TtlStore<DailyMenu>>, source: Arc<dyn MenuSource>) -> Self {
        Self {
            cache,
            source,
            repository: None,
            today_ttl: TODAY_CACHE_TTL,
            default_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn from_config(
        cache: Arc<dyn TtlStore<DailyMenu>>,
        source: Arc<dyn MenuSource>,
        config: &shared::config::Config,
    ) -> Self {
        Self::new(cache, source)
            .with_cache_ttls(config.today_cache_ttl, config.default_cache_ttl)
            .with_fetch_timeout(config.fetch_timeout)
    }

    /// Wire a durable store consulted between the cache and a live fetch.
    pub fn with_repository(mut self, repository: Arc<dyn MealRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_cache_ttls(mut self, today: Duration, default: Duration) -> Self {
        self.today_ttl = today;
        self.default_ttl = default;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Look up the menu for one `YYYY-MM-DD` date key.
    ///
    /// Malformed keys are rejected before any cache or upstream work. Data
    /// absence comes back as [`MenuOutcome::NoOperation`] /
    /// [`MenuOutcome::NoInformation`]; upstream and storage failures come
    /// back as errors and never produce a cache entry.
    pub async fn menu_for(&self, date_key: &str) -> Result<MenuOutcome, MenuError> {
        let date = parse_date_key(date_key)?;
        let key = format_date_key(date);

        if let Some(menu) = self.cache.get(&key).await? {
            debug!("cache hit for {key}");
            return Ok(MenuOutcome::Found(menu));
        }

        if let Some(repository) = &self.repository {
            if let Some(menu) = repository.meal(date).await? {
                debug!("repository hit for {key}");
                self.cache
                    .set(&key, menu.clone(), Some(self.ttl_for(date)))
                    .await?;
                return Ok(MenuOutcome::Found(menu));
            }
        }

        let started = Instant::now();
        let posts = self.fetch(self.source.latest_posts()).await?;
        debug!("fetched {} posts in {:?}", posts.len(), started.elapsed());

        match resolve(&posts, date, dates::kst_today()) {
            PostResolution::Found(post) => {
                let menu = self.fetch_menu(post, date).await?;
                self.cache
                    .set(&key, menu.clone(), Some(self.ttl_for(date)))
                    .await?;
                Ok(MenuOutcome::Found(menu))
            }
            PostResolution::NoOperation => Ok(MenuOutcome::NoOperation),
            PostResolution::NoInformation => Ok(MenuOutcome::NoInformation),
        }
    }

    /// Re-scrape the board and persist every dated post in scope.
    ///
    /// Per-post failures are logged and tallied rather than propagated, so
    /// one broken post does not abort the rest of the sweep. Failing to
    /// fetch the post listing itself still aborts.
    pub async fn refresh(&self, scope: RefreshScope) -> Result<RefreshSummary, MenuError> {
        let started = Instant::now();
        info!("starting menu refresh ({scope:?})");

        let posts = self.fetch(self.source.latest_posts()).await?;
        let today = dates::kst_today();

        let mut prior: Vec<NaiveDate> = Vec::new();
        let mut summary = RefreshSummary::default();

        for post in &posts {
            let Some(date) = dates::parse_korean_date(&post.title, &prior, today) else {
                debug!("skipping undated post {:?}", post.title);
                continue;
            };
            prior.insert(0, date);

            if scope == RefreshScope::Today && date != today {
                continue;
            }

            let key = format_date_key(date);
            match self.refresh_one(post, date, &key).await {
                Ok(()) => {
                    info!("refreshed {key}");
                    summary.succeeded += 1;
                }
                Err(err) => {
                    warn!("failed to refresh {key}: {err}");
                    summary.failed += 1;
                }
            }
        }

        info!(
            "refresh ({scope:?}) finished in {:?}: {} ok, {} failed",
            started.elapsed(),
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    async fn refresh_one(
        &self,
        post: &MenuPost,
        date: NaiveDate,
        key: &str,
    ) -> Result<(), MenuError> {
        let menu = self.fetch_menu(post, date).await?;
        self.cache.set(key, menu, Some(self.ttl_for(date))).await?;
        Ok(())
    }

    /// Fetch one post's body and turn it into a structured menu. Repository
    /// and cache are only written after the whole pipeline succeeded.
    async fn fetch_menu(&self, post: &MenuPost, date: NaiveDate) -> Result<DailyMenu, MenuError> {
        let document = self
            .fetch(self.source.meal_document(&post.document_id))
            .await?;
        let menu = compose_menu(&document);

        if let Some(repository) = &self.repository {
            repository.save_meal(date, &menu, &post.document_id).await?;
        }
        Ok(menu)
    }

    async fn fetch<T>(
        &self,
        fut: impl Future<Output = Result<T, MenuError>>,
    ) -> Result<T, MenuError> {
        tokio::time::timeout(self.fetch_timeout, fut)
            .await
            .map_err(|_| MenuError::Timeout(self.fetch_timeout))?
    }

    fn ttl_for(&self, date: NaiveDate) -> Duration {
        if date == dates::kst_today() {
            self.today_ttl
        } else {
            self.default_ttl
        }
    }
}

/// Extract, segment and decorate each meal section of a scraped post body.
fn compose_menu(document: &MealDocument) -> DailyMenu {
    let mut menu = DailyMenu::default();
    for slot in MealSlot::ALL {
        let section = menu.section_mut(slot);
        if let Some(text) = extract_meal_text(&document.content, slot) {
            *section = segment(&text, slot);
        }
        section.image = document.images.for_slot(slot).map(str::to_string);
    }
    menu
}
