//! Shared helpers for integration tests: in-memory zip archives and mock
//! hosting-service endpoints.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a zip archive from `(entry name, contents)` pairs.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("failed to start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("failed to write zip entry");
    }
    writer
        .finish()
        .expect("failed to finish zip archive")
        .into_inner()
}

/// Builds a one-folder add-on archive containing `<addon>/<addon>.toc`.
pub fn addon_zip(addon: &str) -> Vec<u8> {
    let toc = format!("{addon}/{addon}.toc");
    zip_bytes(&[(toc.as_str(), "## Interface: 90001\n")])
}

/// Serves `body` with status 200 at `route`.
pub async fn mount_bytes(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Serves `body` with status 200 at `route` after `delay`.
pub async fn mount_delayed_bytes(
    server: &MockServer,
    route: &str,
    body: Vec<u8>,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Answers `route` with a 302 redirect to `location` on the same server.
pub async fn mount_redirect(server: &MockServer, route: &str, location: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}{location}", server.uri()).as_str()),
        )
        .mount(server)
        .await;
}

/// Answers `route` with a bare status code.
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serves a download page for `addon` that links to `link_path` on the same server.
pub async fn mount_download_page(server: &MockServer, addon: &str, link_path: &str) {
    let body = format!(
        r#"<html><body><a class="download" href="{}{link_path}">Download</a></body></html>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path(format!("/addons/{addon}/download")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
