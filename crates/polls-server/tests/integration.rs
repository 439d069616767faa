use axum::http::StatusCode;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use polls_core::clock::FixedClock;
use polls_core::store::QuestionDb;
use polls_server::state::AppState;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap()
}

/// Open a store in a temp dir and let `seed` populate it before the router
/// takes ownership.
fn app_with(dir: &TempDir, seed: impl FnOnce(&QuestionDb)) -> axum::Router {
    let db = QuestionDb::open(&dir.path().join("polls.db")).unwrap();
    seed(&db);
    let state = AppState::new(Arc::new(db), Arc::new(FixedClock(now())), "test-site");
    polls_server::build_router(state)
}

/// Send a GET asking for JSON and return (status, parsed JSON body).
async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .header("accept", "application/json")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a plain GET and return (status, template header, body text).
async fn get_html(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let template = response
        .headers()
        .get(polls_server::render::TEMPLATE_HEADER)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, template, String::from_utf8(body.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_with_no_questions_shows_empty_state() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |_| {});

    let (status, template, body) = get_html(app.clone(), "/polls/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template.as_deref(), Some("polls/index.html"));
    assert!(body.contains("등록된 설문조사가 없습니다."));

    let (status, json) = get_json(app, "/polls/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["empty"], true);
    assert_eq!(json["question_list"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn index_hides_future_question() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("test", now() + Duration::days(30))
            .unwrap();
    });

    let (status, _, body) = get_html(app.clone(), "/polls/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("등록된 설문조사가 없습니다."));

    let (_, json) = get_json(app, "/polls/").await;
    assert!(json["question_list"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn index_shows_past_question() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("test", now() - Duration::days(30))
            .unwrap();
    });

    let (status, json) = get_json(app, "/polls/").await;
    assert_eq!(status, StatusCode::OK);
    let list = json["question_list"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["question_text"], "test");
    assert_eq!(list[0]["was_published_recently"], false);
}

#[tokio::test]
async fn index_lists_newer_question_first() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("thirty days ago", now() - Duration::days(30))
            .unwrap();
        db.create_question("five days ago", now() - Duration::days(5))
            .unwrap();
    });

    let (_, json) = get_json(app, "/polls/").await;
    let texts: Vec<&str> = json["question_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["question_text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["five days ago", "thirty days ago"]);
}

#[tokio::test]
async fn index_marks_recent_question_new() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("eight hours", now() - Duration::hours(8))
            .unwrap();
        db.create_question("twenty-five hours", now() - Duration::hours(25))
            .unwrap();
    });

    let (status, _, body) = get_html(app.clone(), "/polls/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("eight hours</a> [New]"));
    assert!(body.contains("twenty-five hours</a></li>"));

    let (_, json) = get_json(app, "/polls/").await;
    let list = json["question_list"].as_array().unwrap();
    assert_eq!(list[0]["was_published_recently"], true);
    assert_eq!(list[1]["was_published_recently"], false);
}

#[tokio::test]
async fn polls_without_slash_redirects() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |_| {});

    let req = axum::http::Request::builder()
        .uri("/polls")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()["location"], "/polls/");
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_of_past_question_shows_choices() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        let q = db
            .create_question("What's up?", now() - Duration::days(5))
            .unwrap();
        db.add_choice(q.id, "choice!", 0).unwrap();
        db.add_choice(q.id, "choice 2!", 0).unwrap();
    });

    let (status, template, body) = get_html(app.clone(), "/polls/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template.as_deref(), Some("polls/detail.html"));
    assert!(body.contains("<h1>What&#x27;s up?</h1>"));
    assert!(body.contains("<li>choice!</li>"));
    assert!(body.contains("<li>choice 2!</li>"));
    assert!(body.contains("<a href=\"/polls/1/results/\">투표 결과 보기</a>"));

    let (_, json) = get_json(app, "/polls/1/").await;
    assert_eq!(json["question"]["id"], 1);
    assert_eq!(json["choices"][0]["choice_text"], "choice!");
    assert_eq!(json["choices"][1]["choice_text"], "choice 2!");
}

#[tokio::test]
async fn detail_of_future_question_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("later", now() + Duration::days(30))
            .unwrap();
    });

    let (status, _) = get_json(app, "/polls/1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn future_and_missing_questions_look_the_same() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        // id 1 exists but is unpublished; id 2 never exists.
        db.create_question("later", now() + Duration::days(30))
            .unwrap();
    });

    let (future_status, future_body) = get_json(app.clone(), "/polls/1/").await;
    let (missing_status, missing_body) = get_json(app, "/polls/2/").await;
    assert_eq!(future_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(
        future_body["error"].as_str().unwrap().replace('1', "N"),
        missing_body["error"].as_str().unwrap().replace('2', "N")
    );
}

#[tokio::test]
async fn non_numeric_id_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |_| {});

    let (status, _) = get_json(app.clone(), "/polls/abc/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_json(app.clone(), "/polls/abc/results/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_json(app, "/polls/+1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn signed_id_is_404_even_when_question_exists() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("What's up?", now() - Duration::days(1))
            .unwrap();
    });

    let (status, _) = get_json(app.clone(), "/polls/1/").await;
    assert_eq!(status, StatusCode::OK);
    for uri in ["/polls/+1/", "/polls/+1/results/", "/polls/+1"] {
        let (status, _) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn detail_and_results_without_slash_redirect() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |_| {});

    for (uri, location) in [
        ("/polls/7", "/polls/7/"),
        ("/polls/7/results", "/polls/7/results/"),
    ] {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT, "{uri}");
        assert_eq!(response.headers()["location"], location);
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn results_report_exact_vote_counts() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        let q = db
            .create_question("tally", now() - Duration::hours(1))
            .unwrap();
        db.add_choice(q.id, "none", 0).unwrap();
        db.add_choice(q.id, "three", 3).unwrap();
    });

    let (status, json) = get_json(app.clone(), "/polls/1/results/").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["choice_text"], "none");
    assert_eq!(results[0]["votes"], 0);
    assert_eq!(results[1]["choice_text"], "three");
    assert_eq!(results[1]["votes"], 3);
    assert_eq!(json["total_votes"], 3);

    let (_, template, body) = get_html(app, "/polls/1/results/").await;
    assert_eq!(template.as_deref(), Some("polls/results.html"));
    assert!(body.contains("Choice: none"));
    assert!(body.contains("Vote Count: 3"));
}

#[tokio::test]
async fn results_of_future_question_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        let q = db
            .create_question("later", now() + Duration::days(30))
            .unwrap();
        db.add_choice(q.id, "hidden", 5).unwrap();
    });

    let (status, json) = get_json(app, "/polls/1/results/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn question_published_exactly_now_is_visible() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |db| {
        db.create_question("on the dot", now()).unwrap();
    });

    let (status, json) = get_json(app.clone(), "/polls/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["question"]["question_text"], "on the dot");

    let (_, json) = get_json(app, "/polls/").await;
    assert_eq!(json["question_list"][0]["was_published_recently"], true);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, |_| {});

    let (status, _) = get_json(app, "/admin/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
