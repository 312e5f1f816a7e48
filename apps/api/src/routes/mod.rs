pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::matching::handlers as matching;
use crate::resumes::{handlers as resumes, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Headroom over the per-file cap for multipart framing and the title field.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_upload),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route("/api/v1/resumes/:id/analyze", post(analysis::handle_analyze))
        .route(
            "/api/v1/resumes/:id/analysis",
            get(analysis::handle_get_analysis),
        )
        .route(
            "/api/v1/resumes/:id/jobs/:job_id/match",
            post(matching::handle_match),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::analysis::AnalysisEngine;
    use crate::auth::CALLER_HEADER;
    use crate::config::Config;
    use crate::llm_client::testing::StubBackend;
    use crate::llm_client::CompletionBackend;
    use crate::matching::JobMatcher;
    use crate::models::job::JobRow;
    use crate::repository::memory::MemoryRepository;
    use crate::storage::{LocalBackend, StorageGateway};

    const BOUNDARY: &str = "resume-intel-test-boundary";

    struct Harness {
        app: Router,
        repo: Arc<MemoryRepository>,
        user: Uuid,
        job_id: Uuid,
        dir: TempDir,
    }

    fn harness(llm: Option<Arc<dyn CompletionBackend>>) -> Harness {
        let dir = TempDir::new().unwrap();
        let config = Config::for_tests(dir.path().to_str().unwrap());
        let job_id = Uuid::new_v4();
        let repo = Arc::new(MemoryRepository::default().with_job(JobRow {
            id: job_id,
            title: "Backend Engineer".to_string(),
            description: Some("Build services on AWS.".to_string()),
            skills: Some("Python, Docker, Kubernetes".to_string()),
        }));
        let storage = StorageGateway::new(None, Arc::new(LocalBackend::new(dir.path())));
        let state = AppState {
            repo: repo.clone(),
            storage: Arc::new(storage),
            engine: Arc::new(AnalysisEngine::from_config(llm.clone(), &config.scoring)),
            matcher: Arc::new(JobMatcher::new(llm, &config.scoring)),
            config,
        };
        Harness {
            app: build_router(state),
            repo,
            user: Uuid::new_v4(),
            job_id,
            dir,
        }
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        use docx_rs::{Docx, Paragraph, Run};
        let mut doc = Docx::new();
        for p in paragraphs {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        doc.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    fn multipart_body(filename: &str, bytes: &[u8], title: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(title) = title {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(user: Uuid, filename: &str, bytes: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(CALLER_HEADER, user.to_string())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(filename, bytes, Some("My CV"))))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str, user: Uuid) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CALLER_HEADER, user.to_string())
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn upload_simon(h: &Harness) -> String {
        let bytes = docx_bytes(&[
            "SIMON TIAN",
            "Experienced software engineer with 5 years experience building backend \
             services in Python, Java, AWS and Docker.",
        ]);
        let (status, body) = send(&h.app, upload_request(h.user, "simon.docx", &bytes)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["resume"]["id"].as_str().unwrap().to_string()
    }

    fn has_keyword_match(matches: &Value) -> bool {
        matches.as_array().is_some_and(|all| {
            all.iter()
                .any(|m| !m["matched_keywords"].as_array().unwrap().is_empty())
        })
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(None);
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&h.app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"], "local");
        assert_eq!(body["llm_configured"], false);
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthorized() {
        let h = harness(None);
        let req = Request::builder()
            .uri("/api/v1/resumes")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_upload_reports_local_storage() {
        let h = harness(None);
        let bytes = docx_bytes(&["Jane Doe"]);
        let (status, body) = send(&h.app, upload_request(h.user, "cv.docx", &bytes)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["storage_type"], "local");
        assert_eq!(body["resume"]["title"], "My CV");
        assert!(body["resume"]["file_url"]
            .as_str()
            .unwrap()
            .starts_with("/uploads/resumes/"));
        assert!(body["resume"].get("extracted_text").is_none());
    }

    #[tokio::test]
    async fn test_upload_exe_rejected_without_row() {
        let h = harness(None);
        let (status, body) = send(&h.app, upload_request(h.user, "malware.exe", b"MZ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.repo.resume_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_cap_per_user() {
        let h = harness(None);
        let bytes = docx_bytes(&["Jane Doe"]);
        for _ in 0..10 {
            let (status, _) = send(&h.app, upload_request(h.user, "cv.docx", &bytes)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, body) = send(&h.app, upload_request(h.user, "cv.docx", &bytes)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.repo.resume_count(), 10);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_cannot_exceed_cap() {
        let h = harness(None);
        let bytes = docx_bytes(&["Jane Doe"]);
        for _ in 0..9 {
            let (status, _) = send(&h.app, upload_request(h.user, "cv.docx", &bytes)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let ((a, _), (b, _)) = tokio::join!(
            send(&h.app, upload_request(h.user, "a.docx", &bytes)),
            send(&h.app, upload_request(h.user, "b.docx", &bytes)),
        );
        let mut statuses = [a, b];
        statuses.sort();
        assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
        assert_eq!(h.repo.resume_count(), 10);
        assert_eq!(std::fs::read_dir(h.dir.path()).unwrap().count(), 10);
    }

    #[tokio::test]
    async fn test_other_users_resume_is_not_found() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let stranger = Uuid::new_v4();
        let (status, body) =
            send(&h.app, empty_request("GET", &format!("/api/v1/resumes/{id}"), stranger)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_analyze_simon_with_heuristic_tier() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let (status, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/analyze"), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["tier"], "heuristic");
        assert_eq!(body["text_extracted"], true);
        assert_eq!(body["analysis"]["candidate_name"], "Simon");
        assert!(body["analysis"]["score_skills"].as_f64().unwrap() > 7.0);
        assert_eq!(body["job_matches"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failing_llm_still_succeeds_with_heuristic() {
        let backend: Arc<dyn CompletionBackend> = Arc::new(StubBackend::failing());
        let h = harness(Some(backend));
        let id = upload_simon(&h).await;
        let (status, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/analyze"), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "heuristic");
    }

    #[tokio::test]
    async fn test_unreadable_document_analyzes_as_mock() {
        let h = harness(None);
        let (status, body) =
            send(&h.app, upload_request(h.user, "broken.pdf", b"not really a pdf")).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["resume"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/analyze"), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "mock");
        assert_eq!(body["text_extracted"], false);
        assert_eq!(body["analysis"]["score_overall"], 5.5);

        let (status, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/jobs/{}/match", h.job_id), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
        assert!(!body["error"]["message"].as_str().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn test_get_analysis_returns_latest() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let uri = format!("/api/v1/resumes/{id}/analysis");

        let (status, _) = send(&h.app, empty_request("GET", &uri, h.user)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(&h.app, empty_request("POST", &format!("/api/v1/resumes/{id}/analyze"), h.user)).await;
        let (status, body) = send(&h.app, empty_request("GET", &uri, h.user)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["tier"], "heuristic");
        assert!(!body["job_matches"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_upsert_keeps_one_row() {
        let backend: Arc<dyn CompletionBackend> = Arc::new(StubBackend::sequence(&[
            r#"{"match_score": 0.35, "match_summary": "You cover part of the stack."}"#,
            r#"{"match_score": 0.82, "match_summary": "You now cover most of the stack."}"#,
        ]));
        let h = harness(Some(backend));
        let id = upload_simon(&h).await;
        let uri = format!("/api/v1/resumes/{id}/jobs/{}/match", h.job_id);

        let (status, first) = send(&h.app, empty_request("POST", &uri, h.user)).await;
        assert_eq!(status, StatusCode::OK, "{first}");
        assert_eq!(first["scorer_backend"], "llm");
        assert_eq!(first["job_match"]["match_score"], 0.35);

        let (status, second) = send(&h.app, empty_request("POST", &uri, h.user)).await;
        assert_eq!(status, StatusCode::OK, "{second}");

        let rows = h.repo.match_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.to_string(), first["job_match"]["id"].as_str().unwrap());
        assert_eq!(second["job_match"]["id"], first["job_match"]["id"]);
        assert_eq!(rows[0].match_score, 0.82);
        assert_eq!(rows[0].match_summary, "You now cover most of the stack.");
        assert_eq!(second["job_match"]["match_score"], 0.82);
    }

    #[tokio::test]
    async fn test_failed_reanalysis_keeps_cached_text() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let resume_id = Uuid::parse_str(&id).unwrap();
        let analyze = format!("/api/v1/resumes/{id}/analyze");

        let (status, body) = send(&h.app, empty_request("POST", &analyze, h.user)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["tier"], "heuristic");
        let cached = h.repo.cached_text(resume_id).unwrap();
        assert!(cached.contains("SIMON TIAN"));

        for entry in std::fs::read_dir(h.dir.path()).unwrap() {
            std::fs::remove_file(entry.unwrap().path()).unwrap();
        }

        let (status, body) = send(&h.app, empty_request("POST", &analyze, h.user)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["tier"], "mock");
        assert_eq!(body["text_extracted"], false);
        assert_eq!(h.repo.cached_text(resume_id).as_deref(), Some(cached.as_str()));
        assert!(has_keyword_match(&body["job_matches"]), "{body}");

        let (status, body) = send(
            &h.app,
            empty_request("GET", &format!("/api/v1/resumes/{id}/analysis"), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["tier"], "mock");
        assert!(has_keyword_match(&body["job_matches"]), "{body}");

        let (status, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/jobs/{}/match", h.job_id), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["scorer_backend"], "keyword");
    }

    #[tokio::test]
    async fn test_get_analysis_without_cached_text_has_no_matches() {
        let h = harness(None);
        let (_, body) =
            send(&h.app, upload_request(h.user, "broken.pdf", b"not really a pdf")).await;
        let id = body["resume"]["id"].as_str().unwrap().to_string();

        let (_, body) = send(
            &h.app,
            empty_request("POST", &format!("/api/v1/resumes/{id}/analyze"), h.user),
        )
        .await;
        assert_eq!(body["job_matches"], Value::Array(vec![]));

        let (status, body) = send(
            &h.app,
            empty_request("GET", &format!("/api/v1/resumes/{id}/analysis"), h.user),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_matches"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_match_unknown_job_is_not_found() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let uri = format!("/api/v1/resumes/{id}/jobs/{}/match", Uuid::new_v4());
        let (status, _) = send(&h.app, empty_request("POST", &uri, h.user)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_file() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let (status, _) =
            send(&h.app, empty_request("DELETE", &format!("/api/v1/resumes/{id}"), h.user)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.repo.resume_count(), 0);
        assert_eq!(std::fs::read_dir(h.dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let h = harness(None);
        let id = upload_simon(&h).await;
        let bytes = docx_bytes(&["Jane Doe", "Rust and Kubernetes"]);
        let req = Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/resumes/{id}"))
            .header(CALLER_HEADER, h.user.to_string())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("jane.docx", &bytes, Some("Updated"))))
            .unwrap();
        let (status, body) = send(&h.app, req).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["title"], "Updated");
        assert_eq!(std::fs::read_dir(h.dir.path()).unwrap().count(), 1);
    }
}
