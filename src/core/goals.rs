use chrono::{Datelike, Months, NaiveDate};

use super::types::{GoalInput, GoalProjection};

/// Months of saving needed to close the gap. `None` means the goal is never
/// reached because nothing is being contributed. Counts too large for `u32`
/// saturate.
pub fn months_to_goal(target: f64, current: f64, monthly_contribution: f64) -> Option<u32> {
    if current >= target {
        return Some(0);
    }
    if monthly_contribution <= 0.0 {
        return None;
    }
    let months = ((target - current) / monthly_contribution).ceil();
    if months >= u32::MAX as f64 {
        return Some(u32::MAX);
    }
    Some(months as u32)
}

/// `None` when the date falls past the end of the supported calendar.
pub fn project_completion_date(today: NaiveDate, months: u32) -> Option<NaiveDate> {
    today.checked_add_months(Months::new(months))
}

/// Largest `n` such that `from` plus `n` calendar months is still on or
/// before `to`. Month ends clamp the same way as `project_completion_date`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let calendar = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let months = calendar.max(0) as u32;
    match project_completion_date(from, months) {
        Some(date) if date <= to => months,
        _ => months.saturating_sub(1),
    }
}

pub fn is_goal_reachable(
    remaining: f64,
    monthly_contribution: f64,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    let Some(deadline) = deadline else {
        return true;
    };
    if remaining <= 0.0 {
        return true;
    }
    remaining <= monthly_contribution * whole_months_between(today, deadline) as f64
}

pub fn required_monthly_saving(remaining: f64, deadline: NaiveDate, today: NaiveDate) -> f64 {
    let months = whole_months_between(today, deadline).max(1);
    remaining / months as f64
}

pub fn project_goal(input: &GoalInput, today: NaiveDate) -> GoalProjection {
    let remaining = (input.target_amount - input.current_amount).max(0.0);
    let progress_percent = if input.target_amount <= 0.0 {
        100.0
    } else {
        (input.current_amount / input.target_amount * 100.0).clamp(0.0, 100.0)
    };
    let months_remaining = months_to_goal(
        input.target_amount,
        input.current_amount,
        input.monthly_contribution,
    );

    GoalProjection {
        remaining,
        progress_percent,
        months_remaining,
        estimated_completion: months_remaining.and_then(|m| project_completion_date(today, m)),
        feasible: is_goal_reachable(
            remaining,
            input.monthly_contribution,
            input.deadline,
            today,
        ),
        required_monthly_saving: input
            .deadline
            .map(|deadline| required_monthly_saving(remaining, deadline, today)),
    }
}
