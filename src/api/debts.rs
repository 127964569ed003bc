use axum::{
    extract::{Json, Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use tracing::info;

use super::payloads::{self, CreateDebtPayload, PaymentPayload};
use super::{ApiError, AppState, ok_response};
use crate::jobs::Job;
use crate::registry::PlanSnapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    revision: u64,
    stale: bool,
    snapshot: Option<PlanSnapshot>,
}

pub(super) async fn list_debts_handler(State(state): State<AppState>) -> Response {
    ok_response(StatusCode::OK, state.registry.list().await)
}

pub(super) async fn get_debt_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    Ok(ok_response(StatusCode::OK, state.registry.get(id).await?))
}

pub(super) async fn create_debt_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateDebtPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let new_debt = payloads::validate_new_debt(payload).map_err(ApiError::Validation)?;
    let created = state.registry.create(new_debt).await;
    info!(debt_id = created.debt.id, "debt registered");
    state.jobs.submit(Job::RecomputePayoffPlan);
    Ok(ok_response(StatusCode::CREATED, created))
}

/// Records a real payment; the cached payoff plan is refreshed in the
/// background after the response is produced.
pub(super) async fn record_payment_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PaymentPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let amount = payloads::validate_payment(payload).map_err(ApiError::Validation)?;
    let updated = state.registry.record_payment(id, amount).await?;
    info!(
        debt_id = id,
        amount,
        remaining = updated.debt.balance,
        active = updated.active,
        "payment recorded"
    );
    state.jobs.submit(Job::RecomputePayoffPlan);
    Ok(ok_response(StatusCode::OK, updated))
}

pub(super) async fn plan_handler(State(state): State<AppState>) -> Response {
    let revision = state.registry.revision().await;
    let snapshot = state.registry.plan().await;
    let stale = snapshot.as_ref().is_none_or(|s| s.revision < revision);
    ok_response(
        StatusCode::OK,
        PlanResponse {
            revision,
            stale,
            snapshot,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobQueue;
    use crate::registry::DebtRegistry;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn test_state() -> AppState {
        let registry = DebtRegistry::new();
        let (jobs, _worker) = JobQueue::start(registry.clone(), 0.0);
        AppState { registry, jobs }
    }

    fn payload<T: serde::de::DeserializeOwned>(value: Value) -> Result<Json<T>, JsonRejection> {
        Ok(Json(serde_json::from_value(value).expect("payload should deserialize")))
    }

    async fn wait_for_fresh_plan(state: &AppState) -> Value {
        for _ in 0..200 {
            let body = body_json(plan_handler(State(state.clone())).await).await;
            if body["data"]["stale"] == false {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("payoff plan was never refreshed");
    }

    #[tokio::test]
    async fn create_then_pay_refreshes_plan_in_background() {
        let state = test_state();
        let created = create_debt_handler(
            State(state.clone()),
            payload(json!({"name": "Store card", "balance": 400, "minimumPayment": 100, "interestRate": 0})),
        )
        .await
        .expect("created");
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["data"]["id"].as_u64().expect("id");
        assert_eq!(created["data"]["active"], true);

        let paid = record_payment_handler(
            State(state.clone()),
            Ok(Path(id)),
            payload(json!({"amount": 200})),
        )
        .await
        .expect("payment");
        let paid = body_json(paid).await;
        assert_eq!(paid["data"]["balance"], 200.0);

        let plan = wait_for_fresh_plan(&state).await;
        assert_eq!(plan["data"]["revision"], 2);
        assert_eq!(plan["data"]["snapshot"]["plan"]["monthsToFreedom"], 2);
    }

    #[tokio::test]
    async fn payment_on_unknown_debt_is_not_found() {
        let state = test_state();
        let response = record_payment_handler(
            State(state),
            Ok(Path(42)),
            payload(json!({"amount": 10})),
        )
        .await
        .expect_err("unknown debt")
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn paying_off_a_debt_keeps_it_listed_as_inactive() {
        let state = test_state();
        let created = body_json(
            create_debt_handler(
                State(state.clone()),
                payload(json!({"name": "Loan", "balance": 50, "minimumPayment": 10})),
            )
            .await
            .expect("created"),
        )
        .await;
        let id = created["data"]["id"].as_u64().expect("id");

        record_payment_handler(State(state.clone()), Ok(Path(id)), payload(json!({"amount": 80})))
            .await
            .expect("payment");

        let again = record_payment_handler(
            State(state.clone()),
            Ok(Path(id)),
            payload(json!({"amount": 5})),
        )
        .await
        .expect_err("inactive debt")
        .into_response();
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);

        let listed = body_json(list_debts_handler(State(state)).await).await;
        assert_eq!(listed["data"][0]["active"], false);
        assert_eq!(listed["data"][0]["balance"], 0.0);
    }
}
