use chrono::NaiveDate;

use super::types::{PeriodComparison, PeriodRange, PeriodValue, Trend, TrendAnalysis};

pub const TREND_THRESHOLD_PERCENT: f64 = 10.0;

/// Percentage change from `previous` to `current`. A zero baseline reads as
/// +100% when anything appeared and 0% otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// A change of exactly the threshold already counts as movement.
pub fn classify_change(change_percent: f64) -> Trend {
    if change_percent >= TREND_THRESHOLD_PERCENT {
        Trend::Up
    } else if change_percent <= -TREND_THRESHOLD_PERCENT {
        Trend::Down
    } else {
        Trend::Stable
    }
}

pub fn detect_trend(current: f64, previous: f64) -> Trend {
    if previous == 0.0 {
        return if current > 0.0 { Trend::Up } else { Trend::Stable };
    }
    classify_change(percent_change(current, previous))
}

pub fn analyze_trend(series: &[f64]) -> TrendAnalysis {
    let (Some(&first), Some(&last)) = (series.first(), series.last()) else {
        return TrendAnalysis {
            trend: Trend::Stable,
            change_percent: 0.0,
        };
    };
    if series.len() == 1 {
        return TrendAnalysis {
            trend: Trend::Stable,
            change_percent: 0.0,
        };
    }
    TrendAnalysis {
        trend: detect_trend(last, first),
        change_percent: percent_change(last, first),
    }
}

pub fn compare_periods(current: PeriodValue, previous: PeriodValue) -> PeriodComparison {
    PeriodComparison {
        current: current.value,
        previous: previous.value,
        change: current.value - previous.value,
        change_percent: percent_change(current.value, previous.value),
    }
}

/// The range of identical length that ends where `range` starts.
pub fn previous_period(range: PeriodRange) -> PeriodRange {
    let duration = range.end.signed_duration_since(range.start);
    PeriodRange {
        start: range
            .start
            .checked_sub_signed(duration)
            .unwrap_or(NaiveDate::MIN),
        end: range.start,
    }
}
