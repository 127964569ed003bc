use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{
    CashflowInput, Debt, Frequency, GoalInput, PayoffStrategy, PeriodRange, PeriodValue,
    ProjectionCadence, RecurringEntry, previous_period,
};
use crate::registry::NewDebt;

pub const MAX_DEBTS: usize = 50;
pub const MAX_RECURRING_ENTRIES: usize = 200;
pub const MAX_SERIES_LEN: usize = 1_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeQuery {
    pub amount: f64,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizeRequest {
    pub amount: f64,
    pub frequency: Frequency,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayload {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub balance: f64,
    pub minimum_payment: f64,
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoffPayload {
    pub debts: Vec<DebtPayload>,
    pub extra_payment: Option<f64>,
    pub strategy: Option<PayoffStrategy>,
    pub include_timeline: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PayoffRequest {
    pub debts: Vec<Debt>,
    pub extra_payment: f64,
    pub strategy: PayoffStrategy,
    pub include_timeline: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    pub deadline: Option<NaiveDate>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct GoalRequest {
    pub input: GoalInput,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowPayload {
    #[serde(default)]
    pub starting_balance: f64,
    pub periods: u32,
    #[serde(default)]
    pub cadence: ProjectionCadence,
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub income: Vec<RecurringEntry>,
    #[serde(default)]
    pub expenses: Vec<RecurringEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TrendPayload {
    pub series: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodPayload {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct ComparePayload {
    pub current: PeriodPayload,
    pub previous: PeriodPayload,
}

#[derive(Debug, Clone, Copy)]
pub struct CompareRequest {
    pub current: PeriodValue,
    pub previous: PeriodValue,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    pub spent: f64,
    pub limit: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtPayload {
    pub name: String,
    pub balance: f64,
    pub minimum_payment: f64,
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentPayload {
    pub amount: f64,
}

fn require_non_negative(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be a finite number >= 0"));
    }
    Ok(value)
}

fn require_positive(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{name} must be a finite number > 0"));
    }
    Ok(value)
}

fn require_rate(name: &str, rate: Option<f64>) -> Result<Option<f64>, String> {
    match rate {
        Some(r) if !r.is_finite() || !(0.0..=100.0).contains(&r) => {
            Err(format!("{name} must be between 0 and 100"))
        }
        other => Ok(other),
    }
}

pub fn validate_normalize(query: NormalizeQuery) -> Result<NormalizeRequest, String> {
    Ok(NormalizeRequest {
        amount: require_non_negative("amount", query.amount)?,
        frequency: query.frequency,
    })
}

pub fn validate_payoff(payload: PayoffPayload) -> Result<PayoffRequest, String> {
    if payload.debts.is_empty() {
        return Err("debts must contain at least one debt".to_string());
    }
    if payload.debts.len() > MAX_DEBTS {
        return Err(format!("debts must contain at most {MAX_DEBTS} entries"));
    }

    let mut seen = HashSet::with_capacity(payload.debts.len());
    let mut debts = Vec::with_capacity(payload.debts.len());
    for (idx, entry) in payload.debts.into_iter().enumerate() {
        let id = entry.id.unwrap_or(idx as u64 + 1);
        if !seen.insert(id) {
            return Err(format!("debts[{idx}].id {id} is duplicated"));
        }
        debts.push(Debt {
            id,
            name: entry
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Debt {id}")),
            balance: require_non_negative(&format!("debts[{idx}].balance"), entry.balance)?,
            minimum_payment: require_positive(
                &format!("debts[{idx}].minimumPayment"),
                entry.minimum_payment,
            )?,
            interest_rate: require_rate(&format!("debts[{idx}].interestRate"), entry.interest_rate)?,
        });
    }

    if debts.iter().all(|d| d.balance <= 0.0) {
        return Err("at least one debt must have a balance > 0".to_string());
    }

    Ok(PayoffRequest {
        debts,
        extra_payment: require_non_negative("extraPayment", payload.extra_payment.unwrap_or(0.0))?,
        strategy: payload.strategy.unwrap_or_default(),
        include_timeline: payload.include_timeline.unwrap_or(true),
    })
}

pub fn payoff_request_from_json(json: &str) -> Result<PayoffRequest, String> {
    let payload = serde_json::from_str::<PayoffPayload>(json)
        .map_err(|e| format!("Invalid payoff JSON payload: {e}"))?;
    validate_payoff(payload)
}

pub fn validate_goal(payload: GoalPayload) -> Result<GoalRequest, String> {
    Ok(GoalRequest {
        input: GoalInput {
            target_amount: require_positive("targetAmount", payload.target_amount)?,
            current_amount: require_non_negative("currentAmount", payload.current_amount)?,
            monthly_contribution: require_non_negative(
                "monthlyContribution",
                payload.monthly_contribution,
            )?,
            deadline: payload.deadline,
        },
        as_of: payload.as_of,
    })
}

fn validate_entries(name: &str, entries: &[RecurringEntry]) -> Result<(), String> {
    if entries.len() > MAX_RECURRING_ENTRIES {
        return Err(format!("{name} must contain at most {MAX_RECURRING_ENTRIES} entries"));
    }
    for (idx, entry) in entries.iter().enumerate() {
        require_non_negative(&format!("{name}[{idx}].amount"), entry.amount)?;
    }
    Ok(())
}

pub fn validate_cashflow(payload: CashflowPayload, today: NaiveDate) -> Result<CashflowInput, String> {
    let max_periods = payload.cadence.max_periods();
    if !(1..=max_periods).contains(&payload.periods) {
        return Err(format!("periods must be between 1 and {max_periods}"));
    }
    validate_entries("income", &payload.income)?;
    validate_entries("expenses", &payload.expenses)?;

    Ok(CashflowInput {
        start: payload.start.unwrap_or(today),
        starting_balance: require_non_negative("startingBalance", payload.starting_balance)?,
        periods: payload.periods,
        cadence: payload.cadence,
        income: payload.income,
        expenses: payload.expenses,
    })
}

pub fn validate_trend(payload: TrendPayload) -> Result<Vec<f64>, String> {
    if payload.series.len() > MAX_SERIES_LEN {
        return Err(format!("series must contain at most {MAX_SERIES_LEN} values"));
    }
    if payload.series.iter().any(|v| !v.is_finite()) {
        return Err("series values must be finite numbers".to_string());
    }
    Ok(payload.series)
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<PeriodRange, String> {
    if end < start {
        return Err("end must not be before start".to_string());
    }
    Ok(PeriodRange { start, end })
}

/// The previous range may be omitted; it then defaults to the range of equal
/// length immediately before the current one.
pub fn validate_compare(payload: ComparePayload) -> Result<CompareRequest, String> {
    let (Some(start), Some(end)) = (payload.current.start, payload.current.end) else {
        return Err("current.start and current.end are required".to_string());
    };
    let current_range = validate_range(start, end)?;
    let previous_range = match (payload.previous.start, payload.previous.end) {
        (Some(start), Some(end)) => validate_range(start, end)?,
        (None, None) => previous_period(current_range),
        _ => {
            return Err("previous.start and previous.end must be given together".to_string());
        }
    };

    Ok(CompareRequest {
        current: PeriodValue {
            range: current_range,
            value: require_non_negative("current.value", payload.current.value)?,
        },
        previous: PeriodValue {
            range: previous_range,
            value: require_non_negative("previous.value", payload.previous.value)?,
        },
    })
}

pub fn validate_budget(query: BudgetQuery) -> Result<(f64, f64), String> {
    Ok((
        require_non_negative("spent", query.spent)?,
        require_non_negative("limit", query.limit)?,
    ))
}

pub fn validate_new_debt(payload: CreateDebtPayload) -> Result<NewDebt, String> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(NewDebt {
        name: name.to_string(),
        balance: require_non_negative("balance", payload.balance)?,
        minimum_payment: require_positive("minimumPayment", payload.minimum_payment)?,
        interest_rate: require_rate("interestRate", payload.interest_rate)?,
    })
}

pub fn validate_payment(payload: PaymentPayload) -> Result<f64, String> {
    require_positive("amount", payload.amount)
}
