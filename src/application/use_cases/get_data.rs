use std::sync::Arc;

use crate::application::cache::{MemoCache, Ttl};
use crate::domain::errors::{AppError, AppResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{services::filter_after, DateCutoff, PricePoint, PriceRepository};

/// Use Case: filtered price table, loaded once per cutoff for the lifetime of the process
pub struct GetDataUseCase<R: PriceRepository> {
    repository: R,
    cutoff: DateCutoff,
    cache: MemoCache<DateCutoff, Arc<Vec<PricePoint>>>,
}

impl<R: PriceRepository> GetDataUseCase<R> {
    pub fn new(repository: R, cutoff: DateCutoff) -> Self {
        Self { repository, cutoff, cache: MemoCache::new(Ttl::Forever) }
    }

    pub fn cutoff(&self) -> DateCutoff {
        self.cutoff
    }

    /// Returns the table and whether it was freshly loaded.
    pub fn execute(&mut self, now_ms: u64) -> AppResult<(Arc<Vec<PricePoint>>, bool)> {
        let repository = &self.repository;
        let cutoff = self.cutoff;
        let cached = self.cache.get_or_try_insert_with(cutoff, now_ms, || {
            let raw = repository.load_prices()?;
            let total = raw.len();
            let kept = filter_after(raw, cutoff);
            get_logger().info(
                LogComponent::Application("GetDataUseCase"),
                &format!(
                    "📊 Loaded {} rows from {}, {} after {}",
                    total,
                    repository.source_name(),
                    kept.len(),
                    cutoff.date()
                ),
            );
            Ok::<_, AppError>(Arc::new(kept))
        })?;
        let loaded = !cached.is_hit();
        Ok((cached.value, loaded))
    }
}
