use axum::{extract::State, Json};
use serde::Serialize;

use crate::salary::{estimate_salary, suggested_skills, SalaryBand, SalaryInput};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SalaryEstimateResponse {
    pub estimate: SalaryBand,
    pub suggested_skills: Vec<String>,
}

/// POST /api/v1/salary/estimate
///
/// Pure computation; no stored state is read or written.
pub async fn handle_estimate_salary(
    State(_state): State<AppState>,
    Json(input): Json<SalaryInput>,
) -> Json<SalaryEstimateResponse> {
    let estimate = estimate_salary(&input);
    let suggested_skills = suggested_skills(&input.job_title, &input.skills);
    Json(SalaryEstimateResponse {
        estimate,
        suggested_skills,
    })
}
