use std::sync::Arc;
use std::time::Duration;

use crate::application::cache::{MemoCache, Ttl};
use crate::domain::chart::{ChartBuilder, ChartSpec};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{DatasetFingerprint, PricePoint, PriceTable};

/// Use Case: base chart (lines, hover points, tooltip rule), cached per dataset
pub struct GetChartUseCase {
    builder: ChartBuilder,
    cache: MemoCache<DatasetFingerprint, Arc<ChartSpec>>,
}

impl GetChartUseCase {
    pub fn new(builder: ChartBuilder, ttl: Duration) -> Self {
        Self { builder, cache: MemoCache::new(Ttl::For(ttl)) }
    }

    /// Returns the chart and whether it was rebuilt.
    pub fn execute(&mut self, data: Arc<Vec<PricePoint>>, now_ms: u64) -> (Arc<ChartSpec>, bool) {
        let fingerprint = PriceTable::new(&data).fingerprint();
        let builder = &self.builder;
        let cached = self.cache.get_or_insert_with(fingerprint, now_ms, || {
            get_logger().info(
                LogComponent::Application("GetChartUseCase"),
                &format!("🏗️ Building chart for dataset {} ({} rows)", &fingerprint.to_hex()[..12], data.len()),
            );
            Arc::new(builder.build(Arc::clone(&data)))
        });
        let rebuilt = !cached.is_hit();
        (cached.value, rebuilt)
    }

    pub fn cached_charts(&self) -> usize {
        self.cache.len()
    }
}
