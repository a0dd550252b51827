//! One row of tabular price history.

use chrono::NaiveDateTime;

use crate::domain::event::Event;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn to_event(&self, instrument: &str) -> Event {
        Event::new(instrument, [self.open, self.high, self.low, self.close])
    }
}

/// Merge per-instrument bar series into a single arrival-ordered event stream.
///
/// Bars are ordered by timestamp; bars sharing a timestamp keep the order of
/// `series` and, within one series, their original order.
pub fn merge_by_time(series: &[(String, Vec<PriceBar>)]) -> Vec<Event> {
    let mut keyed: Vec<(NaiveDateTime, usize, usize, &str, &PriceBar)> = series
        .iter()
        .enumerate()
        .flat_map(|(s, (instrument, bars))| {
            bars.iter()
                .enumerate()
                .map(move |(i, bar)| (bar.timestamp, s, i, instrument.as_str(), bar))
        })
        .collect();
    keyed.sort_by_key(|(ts, s, i, _, _)| (*ts, *s, *i));
    keyed
        .into_iter()
        .map(|(_, _, _, instrument, bar)| bar.to_event(instrument))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
        }
    }

    #[test]
    fn to_event_keeps_ohlc() {
        let event = bar(15, 105.0).to_event("IBOV");
        assert_eq!(event.instrument(), "IBOV");
        assert_eq!(event.price(), &[104.0, 106.0, 103.0, 105.0]);
    }

    #[test]
    fn merge_interleaves_by_timestamp() {
        let series = vec![
            ("PETR3".to_string(), vec![bar(1, 30.0), bar(3, 31.0)]),
            ("USDBRL".to_string(), vec![bar(1, 5.0), bar(2, 5.1)]),
        ];
        let events = merge_by_time(&series);
        let order: Vec<(&str, f64)> = events.iter().map(|e| (e.instrument(), e.close())).collect();
        assert_eq!(
            order,
            vec![("PETR3", 30.0), ("USDBRL", 5.0), ("USDBRL", 5.1), ("PETR3", 31.0)]
        );
    }
}
