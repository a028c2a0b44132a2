// tests/api_tests.rs

use std::sync::Arc;

use exam_server::{
    config::Config,
    models::question::{Difficulty, NewQuestion, QuestionOption},
    repository::{ExamRepository, MemoryRepository},
    routes,
    state::AppState,
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};

const SECRET: &str = "test_secret_for_integration_tests";

struct TestApp {
    address: String,
    repo: Arc<MemoryRepository>,
    client: reqwest::Client,
}

/// Helper function to spawn the app on a random port for testing.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new());

    let config = Config {
        database_url: None,
        jwt_secret: SECRET.to_string(),
        rust_log: "error".to_string(),
        port: 0,
    };

    let state = AppState {
        repo: repo.clone(),
        config,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        repo,
        client: reqwest::Client::new(),
    }
}

fn token_for(user_id: i64) -> String {
    sign_jwt(user_id, "user", SECRET, 600).unwrap()
}

fn admin_token() -> String {
    sign_jwt(1, "admin", SECRET, 600).unwrap()
}

/// Seeds `n` questions whose correct option is index 2. Returns their ids.
async fn seed_questions(repo: &MemoryRepository, n: usize) -> Vec<i64> {
    let mut ids = Vec::new();
    for i in 0..n {
        let q = NewQuestion::new(
            format!("Question {}", i),
            vec![
                QuestionOption { text: "A".into(), is_correct: false },
                QuestionOption { text: "B".into(), is_correct: false },
                QuestionOption { text: "C".into(), is_correct: true },
                QuestionOption { text: "D".into(), is_correct: false },
            ],
            "General",
            Difficulty::Medium,
        )
        .unwrap();
        ids.push(repo.insert_question(q).await.unwrap().id);
    }
    ids
}

impl TestApp {
    async fn submit(&self, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/exam/submit", self.address))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn exam_routes_require_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/api/exam/questions", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app.get("/api/exam/history", "not-a-token").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn questions_are_sampled_without_answers() {
    let app = spawn_app().await;
    seed_questions(&app.repo, 15).await;

    let response = app.get("/api/exam/questions", &token_for(5)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["totalQuestions"], 10);
    assert_eq!(body["examDuration"], 30);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert!(!body.to_string().contains("isCorrect"));
    assert_eq!(questions[0]["options"][3]["index"], 3);

    let body: Value = app
        .get("/api/exam/questions?count=40", &token_for(5))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalQuestions"], 15);

    let body: Value = app
        .get("/api/exam/questions?count=abc", &token_for(5))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalQuestions"], 10);
}

#[tokio::test]
async fn full_exam_flow() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 10).await;
    let token = token_for(7);

    // 7 correct, 2 wrong, 1 unanswered
    let answers: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let selected = match i {
                0..=6 => 2,
                7 | 8 => 0,
                _ => -1,
            };
            json!({ "questionId": id, "selectedOption": selected })
        })
        .collect();

    let response = app
        .submit(&token, json!({ "answers": answers, "timeSpent": 845 }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let result = &body["result"];
    assert_eq!(result["score"], 7);
    assert_eq!(result["totalQuestions"], 10);
    assert_eq!(result["percentage"], 70);
    assert_eq!(result["grade"], "B");
    assert_eq!(result["passed"], true);
    assert_eq!(result["timeSpent"], 845);
    assert!(result.get("questions").is_none());
    let attempt_id = result["id"].as_i64().unwrap();

    // Detail view
    let response = app
        .get(&format!("/api/exam/result/{}", attempt_id), &token)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let detail: Value = response.json().await.unwrap();
    let questions = detail["result"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[0]["correctOption"], 2);
    assert_eq!(questions[0]["isCorrect"], true);
    assert_eq!(questions[0]["options"], json!(["A", "B", "C", "D"]));
    assert_eq!(questions[9]["selectedOption"], -1);
    assert_eq!(questions[9]["isCorrect"], false);

    // History
    let history: Value = app
        .get("/api/exam/history", &token)
        .await
        .json()
        .await
        .unwrap();
    let results = history["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], attempt_id);
    assert!(results[0].get("questions").is_none());
}

#[tokio::test]
async fn unknown_question_ids_are_not_counted() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 2).await;

    let body: Value = app
        .submit(
            &token_for(3),
            json!({
                "answers": [
                    { "questionId": ids[0], "selectedOption": 2 },
                    { "questionId": 987654, "selectedOption": 2 },
                    { "questionId": ids[1], "selectedOption": 1 }
                ]
            }),
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["result"]["score"], 1);
    assert_eq!(body["result"]["totalQuestions"], 2);
    assert_eq!(body["result"]["percentage"], 50);
    assert_eq!(body["result"]["timeSpent"], 0);
}

#[tokio::test]
async fn empty_submission_scores_zero_percent() {
    let app = spawn_app().await;

    let response = app.submit(&token_for(3), json!({ "answers": [] })).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["totalQuestions"], 0);
    assert_eq!(body["result"]["percentage"], 0);
    assert_eq!(body["result"]["grade"], "F");
}

#[tokio::test]
async fn malformed_submissions_are_rejected() {
    let app = spawn_app().await;
    let token = token_for(3);

    let missing = app.submit(&token, json!({ "timeSpent": 10 })).await;
    assert_eq!(missing.status().as_u16(), 400);

    let not_a_list = app.submit(&token, json!({ "answers": "all of them" })).await;
    assert_eq!(not_a_list.status().as_u16(), 400);

    let negative_time = app
        .submit(&token, json!({ "answers": [], "timeSpent": -1 }))
        .await;
    assert_eq!(negative_time.status().as_u16(), 400);
    let body: Value = negative_time.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn results_are_private_to_their_owner() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 1).await;

    let body: Value = app
        .submit(
            &token_for(10),
            json!({ "answers": [{ "questionId": ids[0], "selectedOption": 2 }] }),
        )
        .await
        .json()
        .await
        .unwrap();
    let attempt_id = body["result"]["id"].as_i64().unwrap();

    let foreign = app
        .get(&format!("/api/exam/result/{}", attempt_id), &token_for(11))
        .await;
    assert_eq!(foreign.status().as_u16(), 404);

    let missing = app.get("/api/exam/result/999999", &token_for(11)).await;
    assert_eq!(missing.status().as_u16(), 404);

    let foreign_body: Value = foreign.json().await.unwrap();
    let missing_body: Value = missing.json().await.unwrap();
    assert_eq!(foreign_body, missing_body);

    let history: Value = app
        .get("/api/exam/history", &token_for(11))
        .await
        .json()
        .await
        .unwrap();
    assert!(history["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn history_keeps_latest_ten() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 1).await;
    let token = token_for(20);

    let mut attempt_ids = Vec::new();
    for _ in 0..12 {
        let body: Value = app
            .submit(
                &token,
                json!({ "answers": [{ "questionId": ids[0], "selectedOption": 0 }] }),
            )
            .await
            .json()
            .await
            .unwrap();
        attempt_ids.push(body["result"]["id"].as_i64().unwrap());
    }

    let history: Value = app
        .get("/api/exam/history", &token)
        .await
        .json()
        .await
        .unwrap();
    let listed: Vec<i64> = history["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();

    let expected: Vec<i64> = attempt_ids.iter().rev().take(10).copied().collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn removed_question_degrades_detail_view() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 2).await;
    let token = token_for(30);

    let body: Value = app
        .submit(
            &token,
            json!({
                "answers": [
                    { "questionId": ids[0], "selectedOption": 2 },
                    { "questionId": ids[1], "selectedOption": 2 }
                ]
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    let attempt_id = body["result"]["id"].as_i64().unwrap();

    let deleted = app
        .client
        .delete(format!("{}/api/admin/questions/{}", app.address, ids[1]))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 204);

    let response = app
        .get(&format!("/api/exam/result/{}", attempt_id), &token)
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let detail: Value = response.json().await.unwrap();
    let questions = detail["result"]["questions"].as_array().unwrap();
    assert_eq!(questions[0]["questionRemoved"], false);
    assert_eq!(questions[1]["questionRemoved"], true);
    assert_eq!(questions[1]["question"], Value::Null);
    assert_eq!(questions[1]["correctOption"], -1);
    assert_eq!(detail["result"]["score"], 2);
}

#[tokio::test]
async fn admin_question_management() {
    let app = spawn_app().await;
    let url = format!("{}/api/admin/questions", app.address);
    let question = json!({
        "question": "What is the time complexity of binary search?",
        "options": [
            { "text": "O(n)" },
            { "text": "O(log n)", "isCorrect": true },
            { "text": "O(1)" }
        ],
        "category": "Computer Science",
        "difficulty": "Medium"
    });

    // Regular users are refused
    let response = app
        .client
        .post(&url)
        .bearer_auth(token_for(2))
        .json(&question)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = app
        .client
        .post(&url)
        .bearer_auth(admin_token())
        .json(&question)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(app.repo.find_question(id).await.unwrap().is_some());

    // No correct option
    let response = app
        .client
        .post(&url)
        .bearer_auth(admin_token())
        .json(&json!({
            "question": "Pick one",
            "options": [{ "text": "A" }, { "text": "B" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .client
        .delete(format!("{}/{}", url, id + 100))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn oversized_selection_is_graded_wrong() {
    let app = spawn_app().await;
    let ids = seed_questions(&app.repo, 2).await;
    let token = token_for(40);

    let response = app
        .submit(
            &token,
            json!({
                "answers": [
                    { "questionId": ids[0], "selectedOption": 4294967296u64 },
                    { "questionId": ids[1], "selectedOption": "2" }
                ]
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["score"], 0);
    assert_eq!(body["result"]["totalQuestions"], 2);
    let attempt_id = body["result"]["id"].as_i64().unwrap();

    let detail: Value = app
        .get(&format!("/api/exam/result/{}", attempt_id), &token)
        .await
        .json()
        .await
        .unwrap();
    let questions = detail["result"]["questions"].as_array().unwrap();
    assert_eq!(questions[0]["isCorrect"], false);
    assert_eq!(questions[1]["isCorrect"], false);
    assert_eq!(questions[1]["selectedOption"], -1);
}

#[tokio::test]
async fn non_numeric_result_id_is_not_found() {
    let app = spawn_app().await;
    let token = token_for(41);

    let malformed = app.get("/api/exam/result/not-a-number", &token).await;
    assert_eq!(malformed.status().as_u16(), 404);

    let missing = app.get("/api/exam/result/999999", &token).await;
    let malformed_body: Value = malformed.json().await.unwrap();
    let missing_body: Value = missing.json().await.unwrap();
    assert_eq!(malformed_body, missing_body);
}
