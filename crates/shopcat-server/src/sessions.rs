//! In-memory registry of scrape sessions and the background job that fills
//! one in.
//!
//! Each session is driven by its own spawned task with its own fetcher and
//! rate limiter. The registry is the only state shared between tasks; the
//! progress sink and the HTTP handlers touch it through short critical
//! sections and never hold a guard across an `.await`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use shopcat_core::{CanonicalProduct, ScrapeMetrics};
use shopcat_export::ExportFormat;
use shopcat_scraper::{CatalogFetcher, RateLimiter, ShopifyClient};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Running => write!(f, "running"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// State of one scrape run, as seen by the progress and results endpoints.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    pub id: Uuid,
    pub url: String,
    pub status: SessionStatus,
    /// Products gathered so far; the full batch once completed.
    pub products: Vec<CanonicalProduct>,
    pub latest_product: Option<CanonicalProduct>,
    pub started_at: Instant,
    pub finished_at: Option<Instant>,
    pub metrics: Option<ScrapeMetrics>,
    pub output_file: Option<PathBuf>,
    pub errors: Vec<String>,
}

impl ScrapeSession {
    #[must_use]
    pub fn new(id: Uuid, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            status: SessionStatus::Running,
            products: Vec::new(),
            latest_product: None,
            started_at: Instant::now(),
            finished_at: None,
            metrics: None,
            output_file: None,
            errors: Vec::new(),
        }
    }

    /// Time spent so far, frozen once the run has finished.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.started_at)
    }
}

/// How long a completed or failed session stays readable.
pub const FINISHED_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Shared, cloneable handle to the live sessions of this process.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, ScrapeSession>>>,
}

impl SessionRegistry {
    pub fn insert(&self, session: ScrapeSession) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id, session);
    }

    /// Runs `f` against a session under a read lock.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&ScrapeSession) -> R) -> Option<R> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(f)
    }

    /// Drops sessions that finished at least `ttl` ago and returns how many
    /// were removed. Running sessions are never evicted.
    pub fn evict_finished(&self, ttl: Duration) -> usize {
        let mut sessions = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| {
            session
                .finished_at
                .is_none_or(|finished| finished.elapsed() < ttl)
        });
        before - sessions.len()
    }

    /// Runs `f` against a session under a write lock. Unknown ids are ignored.
    pub fn update(&self, id: Uuid, f: impl FnOnce(&mut ScrapeSession)) {
        if let Some(session) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            f(session);
        }
    }
}

/// Everything a background scrape needs, moved into the spawned task.
#[derive(Debug)]
pub struct ScrapeJob {
    pub session_id: Uuid,
    pub url: String,
    pub max_products: usize,
    /// Delay between page requests, in milliseconds.
    pub rate_limit_ms: u64,
    pub client: ShopifyClient,
    pub output_dir: PathBuf,
}

/// Runs a scrape to completion and records the outcome on its session.
///
/// On success the batch is written to
/// `{output_dir}/scraped_data_{session_id}.json` and metrics are attached.
/// On failure the error is appended to the session's `errors`; products
/// already reported through progress stay visible.
pub async fn run_scrape_job(registry: SessionRegistry, job: ScrapeJob) {
    let ScrapeJob {
        session_id,
        url,
        max_products,
        rate_limit_ms,
        client,
        output_dir,
    } = job;

    tracing::info!(%session_id, %url, max_products, rate_limit_ms, "scrape session started");

    let mut fetcher = CatalogFetcher::new(client, RateLimiter::from_millis(rate_limit_ms));
    let sink_registry = registry.clone();
    let mut sink = move |_count: usize, product: &CanonicalProduct| {
        sink_registry.update(session_id, |session| {
            session.latest_product = Some(product.clone());
            session.products.push(product.clone());
        });
    };

    let products = match fetcher.scrape(&url, Some(max_products), &mut sink).await {
        Ok(products) => products,
        Err(aborted) => {
            tracing::error!(
                %session_id,
                %url,
                page = aborted.page,
                scraped = aborted.products.len(),
                error = %aborted,
                "scrape session failed"
            );
            fail_session(&registry, session_id, aborted.to_string());
            return;
        }
    };

    let elapsed = registry
        .with_session(session_id, ScrapeSession::elapsed)
        .unwrap_or_default();
    let metrics = ScrapeMetrics::compute(&products, elapsed);

    let output_file = match write_session_dump(output_dir, session_id, &products).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(%session_id, error = %e, "failed to write session output");
            registry.update(session_id, |session| session.products = products);
            fail_session(&registry, session_id, format!("failed to write output: {e}"));
            return;
        }
    };

    let total = products.len();
    registry.update(session_id, |session| {
        session.status = SessionStatus::Completed;
        session.products = products;
        session.metrics = Some(metrics);
        session.output_file = Some(output_file);
        session.finished_at = Some(Instant::now());
    });

    tracing::info!(%session_id, %url, total, "scrape session completed");
}

fn fail_session(registry: &SessionRegistry, session_id: Uuid, error: String) {
    registry.update(session_id, |session| {
        session.status = SessionStatus::Failed;
        session.errors.push(error);
        session.finished_at = Some(Instant::now());
    });
}

async fn write_session_dump(
    output_dir: PathBuf,
    session_id: Uuid,
    products: &[CanonicalProduct],
) -> anyhow::Result<PathBuf> {
    let records = products
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let stem = format!("scraped_data_{session_id}");
    let path = tokio::task::spawn_blocking(move || {
        shopcat_export::write_export(&output_dir, &stem, ExportFormat::Json, &records)
    })
    .await??;
    Ok(path)
}
