//! End-to-end scans against mock HTTP servers

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use admin_finder::http_client::ROTATION_USER_AGENTS;
use admin_finder::{scan, ResumeCache, ScanOptions, Scanner};
use common::{bare_host, hangup_server, test_options};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn admin_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/admin/\">Admin</a>"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn statuses_come_back_in_input_order() {
    let server = admin_site().await;
    let options = ScanOptions { follow_redirects: false, ..test_options() };

    let res = scan(&bare_host(&server.uri()), &["admin/", "login", "missing"], &options).await.unwrap();

    assert_eq!(res.len(), 3);
    assert_eq!(res[0].path, "/admin/");
    assert_eq!(res[0].status, 200);
    assert!(res[0].ok);
    assert_eq!(res[0].content_length, 2);
    assert_eq!(res[1].path, "/login");
    assert_eq!(res[1].status, 302);
    assert!(!res[1].ok);
    assert_eq!(res[2].path, "/missing");
    assert_eq!(res[2].status, 404);
    assert!(!res[2].ok);
    assert_eq!(res.iter().filter(|r| r.ok).count(), 1);
    assert_eq!(res[2].url, format!("{}/missing", server.uri()));
}

#[tokio::test]
async fn followed_redirect_is_flagged() {
    let server = admin_site().await;
    let res = scan(&server.uri(), &["login"], &test_options()).await.unwrap();
    let r = &res[0];
    assert_eq!(r.status, 200);
    assert!(r.redirected);
    assert_eq!(r.final_url, format!("{}/", server.uri()));
    assert_eq!(r.url, format!("{}/login", server.uri()));
}

#[tokio::test]
async fn multi_hop_redirect_lands_on_last_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old-admin"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/admin"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/admin/login"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("login"))
        .mount(&server)
        .await;

    let res = scan(&server.uri(), &["old-admin"], &test_options()).await.unwrap();
    let r = &res[0];
    assert_eq!(r.status, 200);
    assert!(r.ok);
    assert!(r.redirected);
    assert_eq!(r.final_url, format!("{}/admin/login", server.uri()));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn query_on_target_does_not_swallow_the_path() {
    let server = admin_site().await;
    let base = format!("{}?lang=en", server.uri());
    let res = scan(&base, &["admin/"], &test_options()).await.unwrap();
    assert_eq!(res[0].url, format!("{}/admin/", server.uri()));
    assert_eq!(res[0].status, 200);
}

#[tokio::test]
async fn empty_path_sends_nothing() {
    let server = admin_site().await;
    let res = scan(&server.uri(), &["", "admin/"], &test_options()).await.unwrap();

    assert_eq!(res.len(), 2);
    assert_eq!(res[0].status, 0);
    assert!(!res[0].ok);
    assert_eq!(res[0].url, "");
    assert!(res[1].ok);
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn unreachable_path_is_tried_three_times() {
    let (base, accepted) = hangup_server().await;
    let res = scan(&base, &["admin"], &test_options()).await.unwrap();

    assert_eq!(accepted.load(Ordering::SeqCst), 3);
    let r = &res[0];
    assert_eq!(r.status, 0);
    assert!(!r.ok);
    assert_eq!(r.elapsed_ms, 0);
    assert_eq!(r.final_url, format!("{base}/admin"));
}

#[tokio::test]
async fn headers_and_cookies_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/panel"))
        .and(header("x-api-key", "k1"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut options = test_options();
    options.headers.insert("X-Api-Key".into(), "k1".into());
    options.cookies.insert("sid".into(), "abc".into());
    let res = scan(&server.uri(), &["panel"], &options).await.unwrap();
    assert!(res[0].ok);
}

#[tokio::test]
async fn rotated_user_agents_come_from_the_pool() {
    let server = admin_site().await;
    let options = ScanOptions { rotate_user_agents: true, ..test_options() };
    let paths: Vec<String> = (0..12).map(|i| format!("p{i}")).collect();
    scan(&server.uri(), &paths, &options).await.unwrap();

    for req in server.received_requests().await.unwrap() {
        let ua = req.headers.get("user-agent").unwrap().to_str().unwrap().to_string();
        assert!(ROTATION_USER_AGENTS.contains(&ua.as_str()), "unexpected UA {ua}");
    }
}

#[tokio::test]
async fn rate_limit_spaces_requests() {
    let server = admin_site().await;
    let options = ScanOptions { rate_limit: Some(20.0), rate_burst: 1, ..test_options() };
    let paths: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();

    let start = Instant::now();
    let res = scan(&server.uri(), &paths, &options).await.unwrap();
    assert_eq!(res.len(), 6);
    // first token is free, five more at 50ms each
    assert!(start.elapsed() >= Duration::from_millis(240));
}

#[tokio::test]
async fn resume_skips_paths_from_a_previous_run() {
    let server = admin_site().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("resume.jsonl");

    let first = Arc::new(ResumeCache::new(&file));
    first.load_seen();
    let scanner = Scanner::new(test_options()).unwrap().with_cache(first.clone());
    for r in scanner.scan(&server.uri(), &["admin/", "login"]).await.unwrap() {
        first.append_result(&r).unwrap();
    }

    let second = Arc::new(ResumeCache::new(&file));
    assert_eq!(second.load_seen().len(), 2);
    let scanner = Scanner::new(test_options()).unwrap().with_cache(second);
    let res = scanner.scan(&server.uri(), &["/admin/", "login", "missing"]).await.unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].path, "/missing");
}
