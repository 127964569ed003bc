use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frequency::Frequency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: u64,
    pub name: String,
    pub balance: f64,
    pub minimum_payment: f64,
    /// Annual rate in percent. `None` means the debt never accrues interest.
    pub interest_rate: Option<f64>,
}

impl Debt {
    pub fn annual_rate(&self) -> f64 {
        self.interest_rate.unwrap_or(0.0).max(0.0)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate() / 100.0 / 12.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffStrategy {
    #[default]
    #[serde(alias = "AVALANCHE")]
    Avalanche,
    #[serde(alias = "SNOWBALL", alias = "bola-de-nieve")]
    Snowball,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffEntry {
    pub debt_id: u64,
    pub interest: f64,
    pub payment: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffMonth {
    pub month: u32,
    pub entries: Vec<PayoffEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoffSummary {
    pub debt_id: u64,
    pub name: String,
    pub interest_rate: f64,
    pub starting_balance: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub payoff_month: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPlan {
    pub strategy: PayoffStrategy,
    /// Debt ids in the order their balances reached zero.
    pub order: Vec<u64>,
    /// Per-debt totals, listed in payment priority.
    pub debts: Vec<DebtPayoffSummary>,
    pub timeline: Vec<PayoffMonth>,
    pub total_paid: f64,
    pub total_interest: f64,
    pub months_to_freedom: Option<u32>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringEntry {
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionCadence {
    #[default]
    #[serde(alias = "MONTHLY", alias = "mensual")]
    Monthly,
    #[serde(alias = "YEARLY", alias = "annual", alias = "anual")]
    Yearly,
}

impl ProjectionCadence {
    pub fn months_per_period(self) -> u32 {
        match self {
            ProjectionCadence::Monthly => 1,
            ProjectionCadence::Yearly => 12,
        }
    }

    pub fn max_periods(self) -> u32 {
        match self {
            ProjectionCadence::Monthly => 12,
            ProjectionCadence::Yearly => 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CashflowInput {
    pub start: NaiveDate,
    pub starting_balance: f64,
    pub periods: u32,
    pub cadence: ProjectionCadence,
    pub income: Vec<RecurringEntry>,
    pub expenses: Vec<RecurringEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashflowPeriod {
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct GoalInput {
    pub target_amount: f64,
    pub current_amount: f64,
    pub monthly_contribution: f64,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub remaining: f64,
    pub progress_percent: f64,
    /// `None` when the goal cannot be reached with the given contribution.
    pub months_remaining: Option<u32>,
    pub estimated_completion: Option<NaiveDate>,
    pub feasible: bool,
    pub required_monthly_saving: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "subida")]
    Up,
    #[serde(rename = "bajada")]
    Down,
    #[serde(rename = "estable")]
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendAnalysis {
    #[serde(rename = "tendencia")]
    pub trend: Trend,
    #[serde(rename = "porcentajeCambio")]
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodValue {
    pub range: PeriodRange,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodComparison {
    #[serde(rename = "actual")]
    pub current: f64,
    #[serde(rename = "anterior")]
    pub previous: f64,
    #[serde(rename = "cambio")]
    pub change: f64,
    #[serde(rename = "cambioPorcentaje")]
    pub change_percent: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub spent: f64,
    pub limit: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub status: BudgetStatus,
}
