use super::types::{BudgetStatus, BudgetUsage};

pub const BUDGET_WARNING_PERCENT: f64 = 80.0;

pub fn percent_of_budget(spent: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return if spent > 0.0 { 100.0 } else { 0.0 };
    }
    spent / limit * 100.0
}

pub fn budget_usage(spent: f64, limit: f64) -> BudgetUsage {
    let percent_used = percent_of_budget(spent, limit);
    let status = if spent > limit {
        BudgetStatus::Exceeded
    } else if percent_used >= BUDGET_WARNING_PERCENT {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    };

    BudgetUsage {
        spent,
        limit,
        remaining: limit - spent,
        percent_used,
        status,
    }
}
