//! End-to-end client behaviour against an in-process fake scoring service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use career_metric::api_client::{ApiError, ScoringApiClient};
use career_metric::health::{HealthMonitor, ServiceStatus};
use career_metric::models::assessment::AssessmentInput;
use career_metric::models::user::UserRegistration;
use career_metric::scoring::{
    compute_local_summary, EvaluationOutcome, FallbackReason, ReadinessScorer,
    REMOTE_FAILED_NOTICE, SIGN_IN_NOTICE, SYNCED_NOTICE,
};
use career_metric::session::{SessionContext, SessionStore, PROFILE_UNAVAILABLE};
use career_metric::submission::{SubmissionFlow, SubmissionState};

const TOKEN: &str = "token-abc";
const PASSWORD: &str = "ChangeMe123!";

#[derive(Clone, Copy, PartialEq)]
enum EvaluateMode {
    Ok,
    Unavailable,
    Unauthorized,
    Garbage,
}

struct FakeService {
    profiles: Vec<Value>,
    evaluate_mode: EvaluateMode,
    evaluations: Vec<(String, Value)>,
    profiles_created: usize,
}

type Shared = Arc<Mutex<FakeService>>;

fn fake(evaluate_mode: EvaluateMode, profiles: Vec<Value>) -> Shared {
    Arc::new(Mutex::new(FakeService {
        profiles,
        evaluate_mode,
        evaluations: Vec::new(),
        profiles_created: 0,
    }))
}

fn profile_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "target_role": role,
        "highest_education": "Master",
        "years_experience": 2.0,
        "current_score_id": null,
        "created_at": "2024-11-07T10:00:00",
        "updated_at": "2024-11-07T10:00:00"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("password").map(String::as_str) != Some(PASSWORD) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response();
    }
    Json(json!({"access_token": TOKEN, "token_type": "bearer", "expires_in": 86400}))
        .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "user-1",
            "email": body["email"],
            "full_name": body["full_name"],
            "headline": body["headline"],
            "is_active": true,
            "is_superuser": false
        })),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": "user-1",
        "email": "candidate@example.com",
        "full_name": "Candidate Persona",
        "is_superuser": false,
        "last_login_at": null
    }))
    .into_response()
}

async fn list_profiles(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(state.lock().unwrap().profiles.clone())).into_response()
}

async fn create_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut service = state.lock().unwrap();
    service.profiles_created += 1;
    let mut profile = profile_json("profile-new", body["target_role"].as_str().unwrap_or(""));
    profile["highest_education"] = body["highest_education"].clone();
    profile["years_experience"] = body["years_experience"].clone();
    service.profiles.push(profile.clone());
    (StatusCode::CREATED, Json(profile)).into_response()
}

async fn evaluate(
    State(state): State<Shared>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut service = state.lock().unwrap();
    match service.evaluate_mode {
        EvaluateMode::Unavailable => {
            return (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response()
        }
        EvaluateMode::Unauthorized => return unauthorized(),
        EvaluateMode::Garbage => return (StatusCode::CREATED, "<html>oops</html>").into_response(),
        EvaluateMode::Ok => {}
    }
    if !authorized(&headers) {
        return unauthorized();
    }
    service.evaluations.push((profile_id.clone(), body));
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "assessment-1",
            "profile_id": profile_id,
            "total_score": 84.6,
            "insights": null,
            "completion_time": null,
            "components": [
                {"id": "c1", "name": "Academic", "score": 75.0, "weight": 0.25},
                {"id": "c2", "name": "Technical", "score": 80.0, "weight": 0.35},
                {"id": "c3", "name": "Soft Skills", "score": 70.0, "weight": 0.2},
                {"id": "c4", "name": "Experience", "score": 60.0, "weight": 0.1},
                {"id": "c5", "name": "Integrations", "score": 90.0, "weight": 0.1}
            ],
            "feedback_entries": [
                {
                    "id": "f1",
                    "category": "Technical",
                    "message": "Great job! Your Technical skills are a clear strength.",
                    "action_items": "Continue refining your skills and mentor peers to reinforce your expertise."
                },
                {
                    "id": "f2",
                    "category": "Experience",
                    "message": "Focus on improving your experience competencies.",
                    "action_items": null
                }
            ],
            "github_summary": {"login": "octocat", "public_repos": 8},
            "cp_summary": {"max_rating": 2050.0}
        })),
    )
        .into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/profiles/", get(list_profiles).post(create_profile))
        .route(
            "/api/v1/assessments/:profile_id/evaluate",
            post(evaluate),
        )
        .with_state(state)
}

async fn spawn(state: Shared) -> ScoringApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    ScoringApiClient::new(&format!("http://{addr}")).unwrap()
}

/// A base URL nothing is listening on.
async fn dead_client() -> ScoringApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ScoringApiClient::new(&format!("http://{addr}")).unwrap()
}

fn context(dir: &TempDir) -> SessionContext {
    SessionContext::new(SessionStore::new(dir.path().join("session.json")))
}

fn intake() -> AssessmentInput {
    AssessmentInput::new(75.0, 80.0, 70.0, 3)
        .with_github("octocat")
        .with_linkedin_headline("Aspiring SDE | Hackathon finalist")
        .with_cp_ratings("1800, 1900, 2050")
        .with_resume("resume.pdf")
}

#[tokio::test]
async fn health_reports_live_and_offline() {
    let api = spawn(fake(EvaluateMode::Ok, vec![])).await;
    let mut monitor = HealthMonitor::default();
    assert_eq!(monitor.refresh(&api).await, ServiceStatus::Online);
    assert!(monitor.pill().starts_with("Live "));

    let mut offline = HealthMonitor::default();
    assert_eq!(offline.refresh(&dead_client().await).await, ServiceStatus::Offline);
    assert_eq!(offline.pill(), "Offline");
}

#[tokio::test]
async fn sign_in_creates_default_profile_and_persists_session() {
    let state = fake(EvaluateMode::Ok, vec![]);
    let api = spawn(state.clone()).await;
    let dir = TempDir::new().unwrap();

    let mut ctx = context(&dir);
    let profile = ctx
        .sign_in(&api, "candidate@example.com", PASSWORD)
        .await
        .unwrap()
        .clone();

    assert_eq!(profile.target_role.as_deref(), Some("Software Engineer"));
    assert_eq!(profile.highest_education.as_deref(), Some("Bachelor"));
    assert_eq!(ctx.status(), Some("Ready to score for Software Engineer."));
    assert_eq!(state.lock().unwrap().profiles_created, 1);

    // A fresh shell picks the stored session back up and reuses the profile.
    let mut restored = context(&dir);
    restored.restore(&api).await.unwrap();
    assert!(restored.is_authenticated());
    assert_eq!(restored.profile().unwrap().id, "profile-new");
    assert_eq!(restored.session().unwrap().email, "candidate@example.com");
    assert_eq!(state.lock().unwrap().profiles_created, 1);
}

#[tokio::test]
async fn restoring_a_good_session_leaves_the_file_untouched() {
    let api = spawn(fake(EvaluateMode::Ok, vec![])).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();
    let hand_edited = "{\n    \"token\": \"token-abc\",\n    \"email\": \"candidate@example.com\"\n}\n";
    std::fs::write(&path, hand_edited).unwrap();

    let mut restored = context(&dir);
    restored.restore(&api).await.unwrap();

    assert!(restored.is_authenticated());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), hand_edited);
}

#[tokio::test]
async fn unreadable_session_file_still_scores_locally() {
    let state = fake(EvaluateMode::Ok, vec![]);
    let api = spawn(state.clone()).await;
    let dir = TempDir::new().unwrap();

    // A directory where the session file should be cannot be read as one.
    let mut ctx = SessionContext::new(SessionStore::new(dir.path()));
    let session = ctx.restore_for_scoring(&api).await;
    assert!(session.is_none());

    let flow = SubmissionFlow::new(ReadinessScorer::new(Arc::new(api)));
    let submission = flow.submit(&intake(), session.as_ref()).await;

    assert_eq!(submission.state, SubmissionState::LocalFallback);
    assert_eq!(flow.current_summary(), compute_local_summary(&intake()));
    assert_eq!(flow.advisory(), Some(SIGN_IN_NOTICE));
    assert!(state.lock().unwrap().evaluations.is_empty());
}

#[tokio::test]
async fn sign_in_uses_first_existing_profile() {
    let state = fake(
        EvaluateMode::Ok,
        vec![profile_json("profile-1", "Data Scientist"), profile_json("profile-2", "SRE")],
    );
    let api = spawn(state.clone()).await;
    let dir = TempDir::new().unwrap();

    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();

    assert_eq!(ctx.active().unwrap().profile_id, "profile-1");
    assert_eq!(state.lock().unwrap().profiles_created, 0);
}

#[tokio::test]
async fn wrong_password_leaves_no_session() {
    let api = spawn(fake(EvaluateMode::Ok, vec![])).await;
    let dir = TempDir::new().unwrap();

    let mut ctx = context(&dir);
    let err = ctx
        .sign_in(&api, "candidate@example.com", "nope")
        .await
        .unwrap_err();

    let api_err = err.downcast_ref::<ApiError>().expect("api error in chain");
    match api_err {
        ApiError::Api { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(ctx.active().is_none());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn register_then_sign_in() {
    let api = spawn(fake(EvaluateMode::Ok, vec![])).await;
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);

    let registration = UserRegistration {
        email: "new@example.com".to_string(),
        password: PASSWORD.to_string(),
        full_name: Some("Candidate Persona".to_string()),
        headline: None,
    };
    ctx.register(&api, &registration).await.unwrap();

    assert!(ctx.is_authenticated());
    assert_eq!(ctx.session().unwrap().email, "new@example.com");
    let user = api.me(&ctx.session().unwrap().token).await.unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Candidate Persona"));
}

#[tokio::test]
async fn rejected_stored_session_is_cleared() {
    let api = spawn(fake(EvaluateMode::Ok, vec![])).await;
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    store
        .save(&career_metric::session::UserSession {
            token: "expired".to_string(),
            email: "candidate@example.com".to_string(),
        })
        .unwrap();

    let mut ctx = SessionContext::new(store.clone());
    ctx.restore(&api).await.unwrap();

    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.status(), Some(PROFILE_UNAVAILABLE));
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn signed_in_submission_syncs_with_service() {
    let state = fake(EvaluateMode::Ok, vec![profile_json("profile-1", "SDE")]);
    let api = spawn(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();

    let flow = SubmissionFlow::new(ReadinessScorer::new(Arc::new(api.clone())));
    let submission = flow.submit(&intake(), ctx.active().as_ref()).await;

    assert_eq!(submission.state, SubmissionState::Synced);
    assert_eq!(submission.outcome.advisory(), SYNCED_NOTICE);
    let summary = flow.current_summary();
    assert_eq!(summary.total_score, 85);
    assert_eq!(summary.components.len(), 5);
    assert_eq!(summary.components[4].name, "Integrations");
    assert_eq!(
        summary.recommendations,
        vec![
            "Great job! Your Technical skills are a clear strength. — Continue refining your skills and mentor peers to reinforce your expertise.",
            "Focus on improving your experience competencies.",
        ]
    );
    assert_eq!(summary.github_summary, Some(json!({"login": "octocat", "public_repos": 8})));
    assert!(summary.linkedin_summary.is_none());

    let service = state.lock().unwrap();
    let (profile_id, body) = &service.evaluations[0];
    assert_eq!(profile_id, "profile-1");
    assert_eq!(body["experience"], json!(60.0));
    assert_eq!(body["integrations"], json!(90.0));
    assert_eq!(body["github_username"], json!("octocat"));
    assert_eq!(
        body["linkedin_data"]["skills"],
        json!(["Aspiring", "SDE", "|", "Hackathon", "finalist"])
    );
    assert_eq!(body["resume_html"], json!("<p>Resume uploaded: resume.pdf</p>"));
    assert_eq!(body["cp_ratings"], json!([1800.0, 1900.0, 2050.0]));
}

#[tokio::test]
async fn unavailable_service_falls_back_to_local() {
    let state = fake(EvaluateMode::Unavailable, vec![profile_json("profile-1", "SDE")]);
    let api = spawn(state).await;
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();

    let flow = SubmissionFlow::new(ReadinessScorer::new(Arc::new(api)));
    let submission = flow.submit(&intake(), ctx.active().as_ref()).await;

    assert_eq!(submission.state, SubmissionState::LocalFallback);
    assert!(submission.outcome.is_degraded());
    assert_eq!(flow.advisory(), Some(REMOTE_FAILED_NOTICE));
    assert_eq!(flow.current_summary(), compute_local_summary(&intake()));
}

#[tokio::test]
async fn rejected_token_on_evaluate_is_auth_fallback() {
    let state = fake(EvaluateMode::Unauthorized, vec![profile_json("profile-1", "SDE")]);
    let api = spawn(state).await;
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();

    let scorer = ReadinessScorer::new(Arc::new(api));
    match scorer.evaluate(&intake(), ctx.active().as_ref()).await {
        EvaluationOutcome::Local {
            summary,
            reason: FallbackReason::RemoteFailed { code, .. },
        } => {
            assert_eq!(code, "AUTH_REQUIRED");
            assert_eq!(summary, compute_local_summary(&intake()));
        }
        other => panic!("expected auth fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_falls_back() {
    let state = fake(EvaluateMode::Garbage, vec![profile_json("profile-1", "SDE")]);
    let api = spawn(state).await;
    let dir = TempDir::new().unwrap();
    let mut ctx = context(&dir);
    ctx.sign_in(&api, "candidate@example.com", PASSWORD).await.unwrap();

    let scorer = ReadinessScorer::new(Arc::new(api));
    match scorer.evaluate(&intake(), ctx.active().as_ref()).await {
        EvaluationOutcome::Local {
            reason: FallbackReason::RemoteFailed { code, .. },
            ..
        } => assert_eq!(code, "VALIDATION_ERROR"),
        other => panic!("expected validation fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_without_session_stays_local() {
    let scorer = ReadinessScorer::new(Arc::new(dead_client().await));
    let outcome = scorer.evaluate(&intake(), None).await;

    assert_eq!(outcome.advisory(), SIGN_IN_NOTICE);
    assert_eq!(outcome.into_summary(), compute_local_summary(&intake()));
}

#[tokio::test]
async fn unreachable_service_with_session_is_network_fallback() {
    let scorer = ReadinessScorer::new(Arc::new(dead_client().await));
    let session = career_metric::session::ActiveSession {
        token: TOKEN.to_string(),
        profile_id: "profile-1".to_string(),
    };
    let outcome = scorer.evaluate(&intake(), Some(&session)).await;

    assert!(outcome.is_degraded());
    match outcome {
        EvaluationOutcome::Local {
            reason: FallbackReason::RemoteFailed { code, .. },
            ..
        } => assert_eq!(code, "NETWORK_ERROR"),
        other => panic!("expected network fallback, got {other:?}"),
    }
}
