use crate::domain::market_data::{DateCutoff, PricePoint};

/// Keep only records dated strictly after the cutoff, preserving order.
pub fn filter_after(points: Vec<PricePoint>, cutoff: DateCutoff) -> Vec<PricePoint> {
    points.into_iter().filter(|p| cutoff.admits(p.date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Price, Symbol};
    use chrono::NaiveDate;

    #[test]
    fn drops_cutoff_day_and_earlier() {
        let cutoff = DateCutoff::parse("2004-01-01").unwrap();
        let points = [(2003, 12), (2004, 1), (2004, 2)]
            .into_iter()
            .map(|(y, m)| {
                PricePoint::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), Symbol::from("IBM"), Price::from(80.0))
            })
            .collect();
        let kept = filter_after(points, cutoff);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, NaiveDate::from_ymd_opt(2004, 2, 1).unwrap());
    }
}
