use chrono::{Datelike, Months, NaiveDate};

use super::frequency::normalize_to_monthly;
use super::types::{CashflowInput, CashflowPeriod, ProjectionCadence, RecurringEntry};

pub fn monthly_total(entries: &[RecurringEntry]) -> f64 {
    entries
        .iter()
        .map(|entry| normalize_to_monthly(entry.amount, entry.frequency))
        .sum()
}

pub fn project_cashflow(input: &CashflowInput) -> Vec<CashflowPeriod> {
    let months_per_period = input.cadence.months_per_period();
    let income = monthly_total(&input.income) * months_per_period as f64;
    let expense = monthly_total(&input.expenses) * months_per_period as f64;
    let net = income - expense;

    let mut balance = input.starting_balance;
    (0..input.periods)
        .map(|period| {
            balance += net;
            CashflowPeriod {
                label: period_label(input.start, input.cadence, period),
                income,
                expense,
                net,
                balance,
            }
        })
        .collect()
}

fn period_label(start: NaiveDate, cadence: ProjectionCadence, index: u32) -> String {
    match cadence {
        ProjectionCadence::Monthly => {
            let first_of_month = start.with_day(1).unwrap_or(start);
            match first_of_month.checked_add_months(Months::new(index)) {
                Some(date) => format!("{:04}-{:02}", date.year(), date.month()),
                None => format!("+{index}m"),
            }
        }
        ProjectionCadence::Yearly => format!("{:04}", start.year() + index as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frequency::Frequency;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn entry(name: &str, amount: f64, frequency: Frequency) -> RecurringEntry {
        RecurringEntry {
            name: name.to_string(),
            amount,
            frequency,
        }
    }

    fn sample_input() -> CashflowInput {
        CashflowInput {
            start: NaiveDate::from_ymd_opt(2026, 11, 20).expect("valid date"),
            starting_balance: 1_000.0,
            periods: 3,
            cadence: ProjectionCadence::Monthly,
            income: vec![entry("salary", 1_500.0, Frequency::Biweekly)],
            expenses: vec![
                entry("rent", 1_200.0, Frequency::Monthly),
                entry("groceries", 100.0, Frequency::Weekly),
            ],
        }
    }

    #[test]
    fn monthly_projection_accumulates_balance() {
        let periods = project_cashflow(&sample_input());

        assert_eq!(periods.len(), 3);
        assert_approx(periods[0].income, 3_000.0);
        assert_approx(periods[0].expense, 1_633.0);
        assert_approx(periods[0].net, 1_367.0);
        assert_approx(periods[0].balance, 2_367.0);
        assert_approx(periods[2].balance, 1_000.0 + 3.0 * 1_367.0);
    }

    #[test]
    fn monthly_labels_roll_over_the_year() {
        let labels = project_cashflow(&sample_input())
            .into_iter()
            .map(|p| p.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["2026-11", "2026-12", "2027-01"]);
    }

    #[test]
    fn yearly_cadence_scales_by_twelve() {
        let mut input = sample_input();
        input.cadence = ProjectionCadence::Yearly;
        input.periods = 2;
        let periods = project_cashflow(&input);

        assert_eq!(periods[0].label, "2026");
        assert_eq!(periods[1].label, "2027");
        assert_approx(periods[0].income, 36_000.0);
        assert_approx(periods[1].balance, 1_000.0 + 2.0 * 12.0 * 1_367.0);
    }

    #[test]
    fn empty_streams_keep_the_starting_balance() {
        let mut input = sample_input();
        input.income.clear();
        input.expenses.clear();
        for period in project_cashflow(&input) {
            assert_approx(period.net, 0.0);
            assert_approx(period.balance, 1_000.0);
        }
    }

    #[test]
    fn zero_periods_yields_empty_series() {
        let mut input = sample_input();
        input.periods = 0;
        assert!(project_cashflow(&input).is_empty());
    }

    proptest! {
        #[test]
        fn prop_balance_is_running_sum_of_net(
            start_balance in 0u32..100_000,
            income in 0u32..10_000,
            expense in 0u32..10_000,
            periods in 1u32..13
        ) {
            let mut input = sample_input();
            input.starting_balance = start_balance as f64;
            input.periods = periods;
            input.income = vec![entry("a", income as f64, Frequency::Monthly)];
            input.expenses = vec![entry("b", expense as f64, Frequency::Monthly)];

            let series = project_cashflow(&input);
            prop_assert_eq!(series.len(), periods as usize);
            let mut expected = start_balance as f64;
            for period in &series {
                expected += period.net;
                prop_assert!((period.balance - expected).abs() <= 1e-6);
            }
            prop_assert_eq!(project_cashflow(&input).len(), series.len());
        }
    }
}
