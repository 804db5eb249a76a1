//! End-to-end polling against a real status endpoint over HTTP.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use folio::routes::build_router;
use folio::state::AppState;
use folio::status::{track_generation, KnownPortfolios, StatusBoard};
use folio::workflow::{
    AttemptPolicy, GenerationWorkflow, HttpStatusSource, Navigator, PollPhase, ProgressStyle,
    WorkflowConfig, WorkflowOutcome,
};

#[derive(Default, Clone)]
struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn fast_config(addr: SocketAddr, portfolio_id: &str) -> WorkflowConfig {
    let mut config = WorkflowConfig::new(
        portfolio_id,
        format!("http://{addr}/portfolios/{portfolio_id}/"),
        format!("http://{addr}/check-status/{portfolio_id}/"),
    );
    config.templates_url = Some(format!("http://{addr}/templates/"));
    config.poll_interval = Duration::from_millis(20);
    config.progress_interval = Duration::from_millis(20);
    config.redirect_delay = Duration::from_millis(10);
    config
}

fn build_workflow(
    config: WorkflowConfig,
    navigator: RecordingNavigator,
) -> GenerationWorkflow<HttpStatusSource, RecordingNavigator> {
    let source = HttpStatusSource::new(&config.check_status_url, Some(Duration::from_secs(5)))
        .unwrap();
    GenerationWorkflow::new(config, source, navigator)
}

#[tokio::test]
async fn test_polls_tracked_generation_to_completion() {
    let board = StatusBoard::new();
    let addr = serve(build_router(AppState::new(
        board.clone(),
        Arc::new(KnownPortfolios::default()),
    )))
    .await;

    let job = track_generation(board.clone(), "17".to_string(), async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        Ok::<(), String>(())
    })
    .await;

    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(fast_config(addr, "17"), navigator.clone());
    let outcome = workflow.run().await;
    job.await.unwrap();

    let expected = format!("http://{addr}/portfolios/17/");
    assert_eq!(
        outcome,
        WorkflowOutcome::Complete {
            redirect_url: expected.clone()
        }
    );
    assert_eq!(navigator.visits(), vec![expected]);

    let state = workflow.snapshot();
    assert_eq!(state.percent, 100);
    assert!(state.is_complete);
    assert!(state.check_count >= 1, "at least one processing response expected");
    assert_eq!(state.error_count, 0);
}

#[tokio::test]
async fn test_known_untracked_portfolio_completes_immediately() {
    let addr = serve(build_router(AppState::new(
        StatusBoard::new(),
        Arc::new(KnownPortfolios::new(["5"])),
    )))
    .await;

    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(fast_config(addr, "5"), navigator.clone());
    let outcome = workflow.run().await;

    assert!(matches!(outcome, WorkflowOutcome::Complete { .. }));
    assert_eq!(workflow.snapshot().check_count, 0);
    assert_eq!(navigator.visits().len(), 1);
}

#[tokio::test]
async fn test_failed_generation_reads_as_pending_until_budget_runs_out() {
    let board = StatusBoard::new();
    board.fail("66", "content service unavailable").await;
    let addr = serve(build_router(AppState::new(
        board,
        Arc::new(KnownPortfolios::default()),
    )))
    .await;

    let mut config = fast_config(addr, "66");
    config.max_attempts = 3;
    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(config, navigator.clone());
    let outcome = workflow.run().await;

    assert_eq!(
        outcome,
        WorkflowOutcome::Exhausted {
            checks: 3,
            errors: 0,
            retry_url: Some(format!("http://{addr}/templates/")),
        }
    );
    assert!(navigator.visits().is_empty());
    assert_eq!(workflow.snapshot().style, ProgressStyle::Warning);
}

/// Answers 500 `failures` times, then reports completion.
async fn flaky_status(State((hits, failures)): State<(Arc<AtomicUsize>, usize)>) -> impl IntoResponse {
    let hit = hits.fetch_add(1, Ordering::SeqCst);
    if hit < failures {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())
    } else {
        (StatusCode::OK, r#"{"status": "complete"}"#.to_string())
    }
}

#[tokio::test]
async fn test_http_error_then_complete_counts_one_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/check-status/:id/", get(flaky_status))
        .with_state((hits.clone(), 1usize));
    let addr = serve(router).await;

    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(fast_config(addr, "2"), navigator.clone());
    let outcome = workflow.run().await;

    assert!(matches!(outcome, WorkflowOutcome::Complete { .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    let state = workflow.snapshot();
    assert_eq!(state.error_count, 1);
    assert_eq!(state.check_count, 0);
    assert_eq!(state.phase, PollPhase::Complete);
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let router = Router::new().route("/check-status/:id/", get(|| async { "not json" }));
    let addr = serve(router).await;

    let mut config = fast_config(addr, "3");
    config.max_attempts = 2;
    let workflow = build_workflow(config, RecordingNavigator::default());
    let outcome = workflow.run().await;

    assert!(matches!(
        outcome,
        WorkflowOutcome::Exhausted { checks: 0, errors: 2, .. }
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_exhausts_shared_budget() {
    // Grab a free port, then close it so connections are refused.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let mut config = fast_config(addr, "11");
    config.max_attempts = 3;
    assert_eq!(config.attempt_policy, AttemptPolicy::SharedBudget);
    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(config, navigator.clone());
    let outcome = workflow.run().await;

    assert!(matches!(
        outcome,
        WorkflowOutcome::Exhausted { checks: 0, errors: 3, .. }
    ));
    assert!(navigator.visits().is_empty());
    assert_eq!(workflow.snapshot().phase, PollPhase::FailedExhausted);
}

#[tokio::test]
async fn test_refused_connection_then_complete_counts_one_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let mut config = fast_config(addr, "12");
    config.poll_interval = Duration::from_millis(200);
    let navigator = RecordingNavigator::default();
    let workflow = build_workflow(config, navigator.clone());

    // Bring the endpoint up only after the first check has been refused.
    let mut rx = workflow.subscribe();
    let start_server = async move {
        rx.wait_for(|state| state.error_count >= 1).await.unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();
        let router = build_router(AppState::new(
            StatusBoard::new(),
            Arc::new(KnownPortfolios::new(["12"])),
        ));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
    };

    let (outcome, ()) = tokio::join!(workflow.run(), start_server);

    assert!(matches!(outcome, WorkflowOutcome::Complete { .. }));
    assert_eq!(navigator.visits().len(), 1);
    let state = workflow.snapshot();
    assert_eq!(state.error_count, 1);
    assert_eq!(state.check_count, 0);
    assert_eq!(state.phase, PollPhase::Complete);
}
