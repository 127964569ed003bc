mod budget;
mod cashflow;
mod frequency;
mod goals;
mod payoff;
mod trend;
mod types;

pub use budget::{BUDGET_WARNING_PERCENT, budget_usage, percent_of_budget};
pub use cashflow::{monthly_total, project_cashflow};
pub use frequency::{Frequency, normalize_to_monthly};
pub use goals::{
    is_goal_reachable, months_to_goal, project_completion_date, project_goal,
    required_monthly_saving, whole_months_between,
};
pub use payoff::{MAX_PAYOFF_MONTHS, calculate_avalanche, calculate_payoff, priority_order};
pub use trend::{
    TREND_THRESHOLD_PERCENT, analyze_trend, compare_periods, detect_trend, percent_change,
    previous_period,
};
pub use types::{
    BudgetStatus, BudgetUsage, CashflowInput, CashflowPeriod, Debt, DebtPayoffSummary,
    GoalInput, GoalProjection, PayoffEntry, PayoffMonth, PayoffPlan, PayoffStrategy,
    PeriodComparison, PeriodRange, PeriodValue, ProjectionCadence, RecurringEntry, Trend,
    TrendAnalysis,
};
