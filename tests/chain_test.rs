//! End-to-end tests for the chain driver over Langbase pipes
//!
//! The step and answer pipes are served by wiremock; step responses are
//! scripted per call so the driver's sequencing can be checked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

use thought_chain_reasoning::capability::{AnswerGenerator, StepGenerator};
use thought_chain_reasoning::config::{DriverConfig, LangbaseConfig, PipeConfig, RequestConfig};
use thought_chain_reasoning::driver::{ChainDriver, TreeRecorder};
use thought_chain_reasoning::error::{AppError, CapabilityError};
use thought_chain_reasoning::langbase::LangbaseClient;
use thought_chain_reasoning::verdict::{Verdict, VerdictAnswer, VERDICT_OUTPUT_FORMAT};
use thought_chain_reasoning::PipeGenerator;

fn create_generator(base_url: &str) -> PipeGenerator {
    let config = LangbaseConfig {
        api_key: "test-api-key".to_string(),
        base_url: base_url.to_string(),
    };
    let request_config = RequestConfig { timeout_ms: 5000 };
    let client = LangbaseClient::new(&config, request_config).expect("Failed to create client");
    PipeGenerator::new(
        client,
        PipeConfig {
            step: "step-pipe".to_string(),
            answer: "answer-pipe".to_string(),
        },
    )
}

fn completion(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "completion": body.to_string()
    }))
}

/// Replies with the scripted steps in order, repeating the last one.
struct ScriptedSteps {
    calls: Arc<AtomicUsize>,
    script: Vec<(&'static str, bool)>,
}

impl Respond for ScriptedSteps {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (step, finished) = self.script[n.min(self.script.len() - 1)];
        completion(json!({"step": step, "finished": finished}))
    }
}

async fn mount_steps(server: &MockServer, script: Vec<(&'static str, bool)>) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .and(body_partial_json(json!({"name": "step-pipe"})))
        .respond_with(ScriptedSteps {
            calls: calls.clone(),
            script,
        })
        .mount(server)
        .await;
    calls
}

async fn mount_answer(server: &MockServer, answer: serde_json::Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .and(body_partial_json(json!({"name": "answer-pipe"})))
        .respond_with(completion(answer))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_generate_step_parses_fenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "completion": "```json\n{\"step\": \"Rule 45 applies\", \"finished\": true}\n```"
        })))
        .mount(&server)
        .await;

    let generator = create_generator(&server.uri());
    let step = generator.generate_step("problem", &[]).await.unwrap();
    assert_eq!(step.step, "Rule 45 applies");
    assert!(step.finished);
}

#[tokio::test]
async fn test_generate_step_rejects_missing_fields() {
    let server = MockServer::start().await;
    mount_answer(&server, json!({}), 0).await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .and(body_partial_json(json!({"name": "step-pipe"})))
        .respond_with(completion(json!({"thought": "wrong shape"})))
        .mount(&server)
        .await;

    let generator = create_generator(&server.uri());
    let err = generator.generate_step("problem", &[]).await.unwrap_err();
    assert!(matches!(err, CapabilityError::Schema { ref schema, .. } if schema == "ReasoningStep"));
}

#[tokio::test]
async fn test_generate_step_rejects_prose() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "completion": "The finch probably shouts."
        })))
        .mount(&server)
        .await;

    let generator = create_generator(&server.uri());
    let err = generator.generate_step("problem", &[]).await.unwrap_err();
    assert!(matches!(err, CapabilityError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unsuccessful_pipe_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "completion": ""
        })))
        .mount(&server)
        .await;

    let generator = create_generator(&server.uri());
    let err = generator.generate_step("problem", &[]).await.unwrap_err();
    assert!(err.to_string().contains("reported failure"));
}

#[tokio::test]
async fn test_generate_answer_sends_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .and(body_partial_json(json!({"name": "answer-pipe"})))
        .respond_with(completion(json!({"solution": "proved"})))
        .expect(1)
        .mount(&server)
        .await;

    let generator = create_generator(&server.uri());
    let schema = <VerdictAnswer as thought_chain_reasoning::StructuredOutput>::schema();
    let value = generator
        .generate_answer("p", &["s1".to_string()], VERDICT_OUTPUT_FORMAT, &schema)
        .await
        .unwrap();
    assert_eq!(value, json!({"solution": "proved"}));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("1. s1"));
    assert!(user.contains("\"enum\":[\"proved\",\"disproved\",\"unknown\"]"));
}

#[tokio::test]
async fn test_chain_three_steps_then_answer() {
    let server = MockServer::start().await;
    let calls = mount_steps(&server, vec![("A", false), ("B", false), ("C", true)]).await;
    mount_answer(&server, json!({"solution": "unproved"}), 1).await;

    let generator = create_generator(&server.uri());
    let driver = ChainDriver::new(
        generator.clone(),
        generator,
        DriverConfig { max_depth: 2 },
    );

    let outcome = driver
        .solve::<VerdictAnswer>("Does the finch shout at the mermaid?", VERDICT_OUTPUT_FORMAT)
        .await
        .unwrap();

    assert_eq!(outcome.steps, vec!["A", "B", "C"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(outcome.answer.solution, Verdict::Disproved);

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[3].body).unwrap();
    assert_eq!(last["name"], "answer-pipe");
    let user = last["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("1. A\n2. B\n3. C\n"));
}

#[tokio::test]
async fn test_chain_depth_cap() {
    let server = MockServer::start().await;
    let calls = mount_steps(&server, vec![("again", false)]).await;
    mount_answer(&server, json!({"solution": "unknown"}), 1).await;

    let generator = create_generator(&server.uri());
    let driver = ChainDriver::new(generator.clone(), generator, DriverConfig::default());

    let mut recorder = TreeRecorder::new("problem");
    let outcome = driver
        .solve_with_observer::<VerdictAnswer, _>("problem", VERDICT_OUTPUT_FORMAT, &mut recorder)
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_eq!(outcome.step_calls, 6);
    assert!(!outcome.finished_naturally);
    assert_eq!(recorder.tree().len(), 7);
}

#[tokio::test]
async fn test_chain_aborts_on_step_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pipes/run"))
        .and(body_partial_json(json!({"name": "step-pipe"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .expect(1)
        .mount(&server)
        .await;
    mount_answer(&server, json!({"solution": "proved"}), 0).await;

    let generator = create_generator(&server.uri());
    let driver = ChainDriver::new(generator.clone(), generator, DriverConfig::default());

    let err = driver
        .solve::<VerdictAnswer>("problem", VERDICT_OUTPUT_FORMAT)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Capability(CapabilityError::Unavailable { .. })
    ));
}
