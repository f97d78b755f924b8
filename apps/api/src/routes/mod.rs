pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::dashboard::handlers as dashboard;
use crate::flows::{
    adjournments, assistant, calendar, drafting, endpoint, evidence, handlers, outcome, reform,
    research, settlement, simplify, summarizer, transcription, triage, Flow, FLOWS_PREFIX,
};
use crate::state::AppState;

/// Registers `POST /api/v1/flows/<path>` for one flow.
fn flow_route<F: Flow>(router: Router<AppState>) -> Router<AppState> {
    router.route(&endpoint::<F>(), post(handlers::handle_flow::<F>))
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Flow API
        .route(FLOWS_PREFIX, get(handlers::handle_list_flows))
        .route(
            &format!("{FLOWS_PREFIX}/transcribe/upload"),
            post(handlers::handle_transcribe_upload),
        )
        // Dashboard API
        .route("/api/v1/dashboard", get(dashboard::handle_overview))
        .route("/api/v1/dashboard/tab", put(dashboard::handle_select_tab))
        .route(
            "/api/v1/dashboard/panels/:tab",
            get(dashboard::handle_get_panel),
        );

    let router = flow_route::<outcome::PredictOutcome>(router);
    let router = flow_route::<evidence::AnalyzeEvidence>(router);
    let router = flow_route::<drafting::DraftDocument>(router);
    let router = flow_route::<research::ResearchCaseLaw>(router);
    let router = flow_route::<transcription::TranscribeProceedings>(router);
    let router = flow_route::<adjournments::AnalyzeAdjournments>(router);
    let router = flow_route::<calendar::OptimizeCalendar>(router);
    let router = flow_route::<settlement::OptimizeSettlement>(router);
    let router = flow_route::<triage::TriageCase>(router);
    let router = flow_route::<summarizer::SummarizeJudgment>(router);
    let router = flow_route::<assistant::LegalAssistant>(router);
    let router = flow_route::<reform::SimulateReform>(router);
    let router = flow_route::<simplify::SimplifyLegal>(router);

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
