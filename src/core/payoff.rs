use super::types::{Debt, DebtPayoffSummary, PayoffEntry, PayoffMonth, PayoffPlan, PayoffStrategy};

pub const MAX_PAYOFF_MONTHS: u32 = 600;

const BALANCE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct DebtState {
    balance: f64,
    total_paid: f64,
    total_interest: f64,
    payoff_month: Option<u32>,
}

pub fn calculate_avalanche(debts: &[Debt], extra_payment: f64) -> PayoffPlan {
    calculate_payoff(debts, extra_payment, PayoffStrategy::Avalanche)
}

pub fn calculate_payoff(debts: &[Debt], extra_payment: f64, strategy: PayoffStrategy) -> PayoffPlan {
    let priority = priority_order(debts, strategy);
    let extra_payment = extra_payment.max(0.0);

    let mut states = debts
        .iter()
        .map(|debt| DebtState {
            balance: debt.balance.max(0.0),
            total_paid: 0.0,
            total_interest: 0.0,
            payoff_month: None,
        })
        .collect::<Vec<_>>();

    let mut order = Vec::with_capacity(debts.len());
    settle_paid_off(debts, &priority, &mut states, 0, &mut order);

    let mut timeline = Vec::new();
    let mut month = 0_u32;
    while states.iter().any(|s| s.balance > 0.0) && month < MAX_PAYOFF_MONTHS {
        month += 1;
        timeline.push(simulate_month(debts, &priority, &mut states, extra_payment, month));
        settle_paid_off(debts, &priority, &mut states, month, &mut order);
    }

    let completed = states.iter().all(|s| s.balance <= 0.0);
    let summaries = priority
        .iter()
        .map(|&idx| {
            let debt = &debts[idx];
            let state = states[idx];
            DebtPayoffSummary {
                debt_id: debt.id,
                name: debt.name.clone(),
                interest_rate: debt.annual_rate(),
                starting_balance: debt.balance.max(0.0),
                total_paid: state.total_paid,
                total_interest: state.total_interest,
                payoff_month: state.payoff_month,
            }
        })
        .collect::<Vec<_>>();

    PayoffPlan {
        strategy,
        order,
        total_paid: states.iter().map(|s| s.total_paid).sum(),
        total_interest: states.iter().map(|s| s.total_interest).sum(),
        debts: summaries,
        timeline,
        months_to_freedom: completed.then_some(month),
        completed,
    }
}

/// Indices into `debts`, highest priority first. The sort is stable so ties
/// keep the caller's order.
pub fn priority_order(debts: &[Debt], strategy: PayoffStrategy) -> Vec<usize> {
    let mut indices = (0..debts.len()).collect::<Vec<_>>();
    match strategy {
        PayoffStrategy::Avalanche => indices
            .sort_by(|&a, &b| debts[b].annual_rate().total_cmp(&debts[a].annual_rate())),
        PayoffStrategy::Snowball => {
            indices.sort_by(|&a, &b| debts[a].balance.total_cmp(&debts[b].balance))
        }
    }
    indices
}

fn simulate_month(
    debts: &[Debt],
    priority: &[usize],
    states: &mut [DebtState],
    extra_payment: f64,
    month: u32,
) -> PayoffMonth {
    let mut interest = vec![0.0; debts.len()];
    let mut payment = vec![0.0; debts.len()];

    for (idx, state) in states.iter_mut().enumerate() {
        if state.balance > 0.0 {
            let accrued = state.balance * debts[idx].monthly_rate();
            state.balance += accrued;
            state.total_interest += accrued;
            interest[idx] = accrued;
        }
    }

    // Minimums first; whatever a debt cannot absorb joins the surplus pool.
    let mut pool = extra_payment;
    for &idx in priority {
        let minimum = debts[idx].minimum_payment.max(0.0);
        let applied = apply_payment(&mut states[idx], minimum);
        payment[idx] += applied;
        pool += minimum - applied;
    }

    for &idx in priority {
        if pool <= BALANCE_EPS {
            break;
        }
        let applied = apply_payment(&mut states[idx], pool);
        payment[idx] += applied;
        pool -= applied;
    }

    let entries = debts
        .iter()
        .enumerate()
        .map(|(idx, debt)| PayoffEntry {
            debt_id: debt.id,
            interest: interest[idx],
            payment: payment[idx],
            remaining_balance: states[idx].balance,
        })
        .collect();

    PayoffMonth { month, entries }
}

fn apply_payment(state: &mut DebtState, amount: f64) -> f64 {
    if state.balance <= 0.0 || amount <= 0.0 {
        return 0.0;
    }
    let applied = amount.min(state.balance);
    state.balance -= applied;
    if state.balance <= BALANCE_EPS {
        state.balance = 0.0;
    }
    state.total_paid += applied;
    applied
}

fn settle_paid_off(
    debts: &[Debt],
    priority: &[usize],
    states: &mut [DebtState],
    month: u32,
    order: &mut Vec<u64>,
) {
    for &idx in priority {
        let state = &mut states[idx];
        if state.payoff_month.is_none() && state.balance <= BALANCE_EPS {
            state.balance = 0.0;
            state.payoff_month = Some(month);
            order.push(debts[idx].id);
        }
    }
}
