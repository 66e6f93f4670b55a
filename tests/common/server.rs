//! Mock feed server helpers

use std::path::Path;
use std::time::Duration;
use tldsgen::{Config, FeedConfig, LineRule, OutputConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `body` at `route` with status 200 and return the full URL
pub async fn serve_feed(server: &MockServer, route: &str, body: &str) -> String {
    serve(server, route, ResponseTemplate::new(200).set_body_string(body)).await
}

/// Serve `body` at `route` after `delay`
pub async fn serve_slow_feed(
    server: &MockServer,
    route: &str,
    body: &str,
    delay: Duration,
) -> String {
    serve(
        server,
        route,
        ResponseTemplate::new(200)
            .set_body_string(body)
            .set_delay(delay),
    )
    .await
}

/// Answer `route` with a bare status code
pub async fn serve_status(server: &MockServer, route: &str, status: u16) -> String {
    serve(server, route, ResponseTemplate::new(status)).await
}

/// Mount `template` at `route`, expecting exactly one request
pub async fn serve(server: &MockServer, route: &str, template: ResponseTemplate) -> String {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
    format!("{}{}", server.uri(), route)
}

/// Config with a plain-list feed and a structured feed writing to `output`
pub fn two_feed_config(plain: &str, structured: &str, output: &Path) -> Config {
    Config {
        feeds: vec![
            FeedConfig::new(plain, LineRule::PlainList),
            FeedConfig::new(structured, LineRule::Structured),
        ],
        output: OutputConfig {
            path: output.to_path_buf(),
            ..OutputConfig::default()
        },
    }
}

/// Extract the quoted TLD literals from a rendered artifact, in file order
pub fn artifact_tlds(artifact: &str) -> Vec<String> {
    artifact
        .lines()
        .filter_map(|line| line.strip_prefix("\t`"))
        .filter_map(|line| line.strip_suffix("`,"))
        .map(str::to_string)
        .collect()
}
