use std::cell::Cell;
use std::sync::Arc;

use annotated_price_chart::application::use_cases::GetDataUseCase;
use annotated_price_chart::domain::errors::{AppError, AppResult};
use annotated_price_chart::domain::market_data::{DateCutoff, PricePoint, PriceRepository, PriceTable, Symbol};
use annotated_price_chart::infrastructure::EmbeddedStocksRepository;
use annotated_price_chart::infrastructure::sample_data::parse_stocks_csv;
use chrono::NaiveDate;

fn cutoff() -> DateCutoff {
    DateCutoff::parse("2004-01-01").unwrap()
}

#[test]
fn filtered_rows_are_after_cutoff() {
    let mut use_case = GetDataUseCase::new(EmbeddedStocksRepository::new(), cutoff());
    let (rows, loaded) = use_case.execute(0).unwrap();
    assert!(loaded);
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row.date > NaiveDate::from_ymd_opt(2004, 1, 1).unwrap()));
}

#[test]
fn goog_march_2008_survives_the_filter() {
    let mut use_case = GetDataUseCase::new(EmbeddedStocksRepository::new(), cutoff());
    let (rows, _) = use_case.execute(0).unwrap();
    let table = PriceTable::new(&rows);
    let on_day = table.on_date(NaiveDate::from_ymd_opt(2008, 3, 1).unwrap());
    let goog = on_day.iter().find(|row| row.symbol == Symbol::from("GOOG")).unwrap();
    assert_eq!(goog.price.value(), 440.47);
    assert_eq!(table.symbols().len(), 5);
}

#[test]
fn repeated_calls_share_the_same_table() {
    let mut use_case = GetDataUseCase::new(EmbeddedStocksRepository::new(), cutoff());
    let (first, _) = use_case.execute(0).unwrap();
    // Forever: even a far later call must not reload.
    let (second, loaded) = use_case.execute(u64::MAX / 2).unwrap();
    assert!(!loaded);
    assert!(Arc::ptr_eq(&first, &second));
}

struct FlakyRepository {
    calls: Cell<u32>,
}

impl PriceRepository for FlakyRepository {
    fn load_prices(&self) -> AppResult<Vec<PricePoint>> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == 1 {
            return Err(AppError::Data("source unavailable".to_string()));
        }
        parse_stocks_csv("symbol,date,price\nIBM,Feb 1 2004,99.23\n")
    }

    fn source_name(&self) -> &str {
        "flaky"
    }
}

#[test]
fn load_failure_is_not_cached() {
    let mut use_case = GetDataUseCase::new(FlakyRepository { calls: Cell::new(0) }, cutoff());
    assert!(matches!(use_case.execute(0), Err(AppError::Data(_))));
    let (rows, loaded) = use_case.execute(1).unwrap();
    assert!(loaded);
    assert_eq!(rows.len(), 1);
}

#[test]
fn embedded_table_parses_completely() {
    let rows = EmbeddedStocksRepository::new().load_prices().unwrap();
    assert!(rows.iter().any(|row| row.date < NaiveDate::from_ymd_opt(2004, 1, 1).unwrap()));
    assert!(rows.iter().all(|row| row.price.value() > 0.0));
}
