use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::{Debt, PayoffPlan};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("debt {0} not found")]
    NotFound(u64),
    #[error("debt {0} is already paid off and inactive")]
    Inactive(u64),
    #[error("{0}")]
    InvalidAmount(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDebt {
    #[serde(flatten)]
    pub debt: Debt,
    pub original_balance: f64,
    pub total_paid: f64,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewDebt {
    pub name: String,
    pub balance: f64,
    pub minimum_payment: f64,
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub revision: u64,
    pub computed_at: DateTime<Utc>,
    pub plan: PayoffPlan,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    revision: u64,
    debts: Vec<RegisteredDebt>,
    plan: Option<PlanSnapshot>,
}

/// Debts tracked by the running service. Entries are never removed; a debt
/// whose balance reaches zero is kept with `active = false`.
#[derive(Debug, Clone, Default)]
pub struct DebtRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl DebtRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, new_debt: NewDebt) -> RegisteredDebt {
        let mut state = self.inner.write().await;
        state.next_id += 1;
        state.revision += 1;
        let balance = new_debt.balance.max(0.0);
        let registered = RegisteredDebt {
            debt: Debt {
                id: state.next_id,
                name: new_debt.name,
                balance,
                minimum_payment: new_debt.minimum_payment,
                interest_rate: new_debt.interest_rate,
            },
            original_balance: balance,
            total_paid: 0.0,
            active: balance > 0.0,
        };
        state.debts.push(registered.clone());
        registered
    }

    pub async fn list(&self) -> Vec<RegisteredDebt> {
        self.inner.read().await.debts.clone()
    }

    pub async fn get(&self, id: u64) -> Result<RegisteredDebt, RegistryError> {
        self.inner
            .read()
            .await
            .debts
            .iter()
            .find(|d| d.debt.id == id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Applies a real payment. Any amount above the outstanding balance is
    /// ignored and the debt is deactivated once it reaches zero.
    pub async fn record_payment(&self, id: u64, amount: f64) -> Result<RegisteredDebt, RegistryError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RegistryError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let mut state = self.inner.write().await;
        let entry = state
            .debts
            .iter_mut()
            .find(|d| d.debt.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        if !entry.active {
            return Err(RegistryError::Inactive(id));
        }

        let applied = amount.min(entry.debt.balance);
        entry.debt.balance -= applied;
        entry.total_paid += applied;
        if entry.debt.balance <= 1e-9 {
            entry.debt.balance = 0.0;
            entry.active = false;
        }
        let updated = entry.clone();
        state.revision += 1;
        Ok(updated)
    }

    pub async fn revision(&self) -> u64 {
        self.inner.read().await.revision
    }

    /// Active debts together with the revision they were read at.
    pub async fn active_debts(&self) -> (u64, Vec<Debt>) {
        let state = self.inner.read().await;
        let debts = state
            .debts
            .iter()
            .filter(|d| d.active)
            .map(|d| d.debt.clone())
            .collect();
        (state.revision, debts)
    }

    /// Stores `plan` unless a snapshot for a newer revision is already held.
    /// Returns whether the snapshot was replaced.
    pub async fn store_plan(&self, revision: u64, plan: PayoffPlan) -> bool {
        let mut state = self.inner.write().await;
        if state
            .plan
            .as_ref()
            .is_some_and(|existing| existing.revision > revision)
        {
            return false;
        }
        state.plan = Some(PlanSnapshot {
            revision,
            computed_at: Utc::now(),
            plan,
        });
        true
    }

    pub async fn plan(&self) -> Option<PlanSnapshot> {
        self.inner.read().await.plan.clone()
    }
}
