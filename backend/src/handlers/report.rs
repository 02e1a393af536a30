//! HTTP handlers for reports

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::report::{DailyReport, DailyReportQuery};
use crate::services::ReportService;
use crate::AppState;

/// Daily sales aggregate
pub async fn daily_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<DailyReportQuery>,
) -> AppResult<Json<DailyReport>> {
    let service = ReportService::new(state.db);
    let report = service.daily(query.date).await?;
    Ok(Json(report))
}
