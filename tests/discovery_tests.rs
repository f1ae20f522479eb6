//! Discovery fetchers against mock servers

use admin_finder::discover::{discover_all, fetch_homepage_hints, fetch_robots_paths, fetch_sitemap_paths};
use reqwest::Client;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn robots_disallow_hints() {
    let server = MockServer::start().await;
    mount(&server, "/robots.txt", 200, "User-agent: *\nDisallow: /admin/\nDisallow: /private\n").await;

    let paths = fetch_robots_paths(&Client::new(), &server.uri()).await;
    assert_eq!(paths, vec!["/admin/"]);
}

#[tokio::test]
async fn sitemap_and_homepage_hints() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/sitemap.xml",
        200,
        "<urlset><url><loc>http://example.com/</loc></url><url><loc>http://example.com/admin/login</loc></url></urlset>",
    )
    .await;
    mount(&server, "/", 200, r#"<a href="/dashboard">Dashboard</a> <a href="/public">Public</a>"#).await;

    let client = Client::new();
    let sm = fetch_sitemap_paths(&client, &server.uri()).await;
    let hp = fetch_homepage_hints(&client, &server.uri()).await;
    assert!(sm.contains(&"/admin/login".to_string()));
    assert_eq!(hp, vec!["/dashboard"]);
}

#[tokio::test]
async fn sitemap_index_is_also_read() {
    let server = MockServer::start().await;
    mount(&server, "/sitemap_index.xml", 200, "<sitemapindex><loc>https://x.test/cpanel</loc></sitemapindex>").await;
    let sm = fetch_sitemap_paths(&Client::new(), &server.uri()).await;
    assert_eq!(sm, vec!["/cpanel"]);
}

#[tokio::test]
async fn non_200_and_unreachable_sources_fail_soft() {
    let server = MockServer::start().await;
    mount(&server, "/robots.txt", 500, "Disallow: /admin").await;
    let client = Client::new();
    assert!(fetch_robots_paths(&client, &server.uri()).await.is_empty());
    assert!(fetch_sitemap_paths(&client, &server.uri()).await.is_empty());
    assert!(fetch_homepage_hints(&client, &server.uri()).await.is_empty());

    // nothing listens on port 1
    assert!(discover_all(&client, "http://127.0.0.1:1").await.is_empty());
}

#[tokio::test]
async fn discover_all_concatenates_in_source_order() {
    let server = MockServer::start().await;
    mount(&server, "/robots.txt", 200, "Disallow: /wp-admin/").await;
    mount(&server, "/sitemap.xml", 200, "<loc>/login</loc>").await;
    mount(&server, "/", 200, r#"<a href="/cpanel">cp</a>"#).await;

    let all = discover_all(&Client::new(), &server.uri()).await;
    assert_eq!(all, vec!["/wp-admin/", "/login", "/cpanel"]);
}
