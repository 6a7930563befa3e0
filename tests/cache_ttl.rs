use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use annotated_price_chart::application::cache::{CacheStatus, MemoCache, Ttl};
use annotated_price_chart::application::coordinator::DashboardCoordinator;
use annotated_price_chart::application::use_cases::GetChartUseCase;
use annotated_price_chart::config::DashboardConfig;
use annotated_price_chart::domain::chart::ChartBuilder;
use annotated_price_chart::domain::events::ControlEvent;
use annotated_price_chart::domain::market_data::{Price, PricePoint, Symbol};
use annotated_price_chart::infrastructure::EmbeddedStocksRepository;
use chrono::NaiveDate;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

fn rows(price: f64) -> Arc<Vec<PricePoint>> {
    Arc::new(vec![PricePoint::new(
        NaiveDate::from_ymd_opt(2008, 3, 1).unwrap(),
        Symbol::from("GOOG"),
        Price::from(price),
    )])
}

#[test]
fn forever_entries_never_expire() {
    let mut cache: MemoCache<&str, u32> = MemoCache::new(Ttl::Forever);
    assert_eq!(cache.get_or_insert_with("data", 0, || 1).status, CacheStatus::Miss);
    let later = cache.get_or_insert_with("data", 365 * DAY_MS, || 2);
    assert!(later.is_hit());
    assert_eq!(later.value, 1);
}

#[test]
fn timed_entries_expire_after_a_day() {
    let mut cache: MemoCache<&str, u32> = MemoCache::new(Ttl::For(Duration::from_secs(86_400)));
    cache.get_or_insert_with("chart", 0, || 1);
    assert_eq!(cache.get(&"chart", DAY_MS - 1), Some(1));
    assert_eq!(cache.get(&"chart", DAY_MS), None);

    let rebuilt = cache.get_or_insert_with("chart", DAY_MS, || 2);
    assert!(!rebuilt.is_hit());
    assert_eq!(rebuilt.value, 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn invalidate_forces_recompute() {
    let mut cache: MemoCache<u8, u8> = MemoCache::new(Ttl::Forever);
    cache.get_or_insert_with(1, 0, || 10);
    assert!(cache.invalidate(&1));
    assert!(!cache.invalidate(&1));
    assert_eq!(cache.get_or_insert_with(1, 0, || 11).value, 11);
}

#[test]
fn chart_is_reused_for_identical_data() {
    let mut use_case = GetChartUseCase::new(ChartBuilder::new("t", 500), Duration::from_secs(86_400));
    let (first, rebuilt) = use_case.execute(rows(440.47), 0);
    assert!(rebuilt);
    // Different Arc, same content: still a hit.
    let (second, rebuilt) = use_case.execute(rows(440.47), 1_000);
    assert!(!rebuilt);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn changed_data_builds_a_new_chart() {
    let mut use_case = GetChartUseCase::new(ChartBuilder::new("t", 500), Duration::from_secs(86_400));
    let (first, _) = use_case.execute(rows(440.47), 0);
    let (second, rebuilt) = use_case.execute(rows(441.0), 0);
    assert!(rebuilt);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(use_case.cached_charts(), 2);
}

#[test]
fn dashboard_rebuilds_base_chart_once_a_day() {
    let now = Rc::new(Cell::new(0u64));
    let clock = Rc::clone(&now);
    let mut coordinator = DashboardCoordinator::new(EmbeddedStocksRepository::new(), DashboardConfig::default())
        .unwrap()
        .with_clock(move || clock.get());

    let plan = coordinator.start().unwrap();
    assert!(plan.data_reloaded && plan.chart_rebuilt);
    let base = Arc::clone(&coordinator.frame().unwrap().base);

    now.set(DAY_MS / 2);
    let plan = coordinator.dispatch(ControlEvent::TextChanged("Noon".to_string())).unwrap();
    assert!(!plan.chart_rebuilt);
    assert!(Arc::ptr_eq(&base, &coordinator.frame().unwrap().base));

    now.set(DAY_MS + 1);
    let plan = coordinator.dispatch(ControlEvent::TextChanged("Tomorrow".to_string())).unwrap();
    assert!(plan.chart_rebuilt);
    assert!(!plan.data_reloaded);
    assert!(!Arc::ptr_eq(&base, &coordinator.frame().unwrap().base));
    assert_eq!(coordinator.cached_charts(), 1);
    assert_eq!(coordinator.composed().unwrap().layers[3].text_mark().unwrap().text, "Tomorrow");
}
