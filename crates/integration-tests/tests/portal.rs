//! Portal end-to-end tests: Students login and HR Analytics uploads.

#![allow(clippy::unwrap_used)]

use reqwest::{StatusCode, multipart};
use techealth_integration_tests::{TestServer, data_dir, seed_credentials, spawn_portal};
use techealth_sheets::{CredentialSchema, Table, files, workbook::write_xlsx};

async fn portal_with_bob() -> TestServer {
    let dir = data_dir();
    seed_credentials(
        dir.path(),
        files::PORTAL_ADMIN_CREDENTIALS,
        CredentialSchema::PORTAL_ADMIN,
        &[("bob", "x1")],
    );
    spawn_portal(dir).await
}

#[tokio::test]
async fn test_students_login_unlocks_dashboard() {
    let server = portal_with_bob().await;

    let resp = server.client.get(server.url("/students")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Please log in"));

    let resp = server
        .client
        .post(server.url("/students/login"))
        .form(&[("username", "bob"), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await.unwrap().contains("Invalid username or password"));

    let resp = server
        .client
        .post(server.url("/students/login"))
        .form(&[("username", "bob"), ("password", "x1")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/students");
    assert!(resp.text().await.unwrap().contains("Student Performance Dashboard"));

    // The unlock belongs to this browser only.
    let other = TestServer::fresh_client();
    let body = other
        .get(server.url("/students"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Student Performance Dashboard"));
}

#[tokio::test]
async fn test_login_is_exact_match() {
    let server = portal_with_bob().await;

    for (username, password) in [("Bob", "x1"), ("bob ", "x1"), ("bob", "X1")] {
        let resp = server
            .client
            .post(server.url("/students/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{username}/{password}");
    }
}

#[tokio::test]
async fn test_csv_upload_is_rendered() {
    let server = spawn_portal(data_dir()).await;

    let part = multipart::Part::bytes(b"name,age\nAna,30\nLuis,41\n".to_vec()).file_name("people.csv");
    let resp = server
        .client
        .post(server.url("/hr-analytics/upload"))
        .multipart(multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("DataFrame: people.csv"));
    assert!(body.contains("Luis"));
    assert!(body.contains("Column Analysis"));
}

#[tokio::test]
async fn test_malformed_upload_keeps_page_usable() {
    let server = spawn_portal(data_dir()).await;

    let part = multipart::Part::bytes(b"not a workbook".to_vec()).file_name("broken.xlsx");
    let resp = server
        .client
        .post(server.url("/hr-analytics/upload"))
        .multipart(multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Error loading or processing the file"));
    assert!(body.contains("Upload Completed Excel File"));
}

#[tokio::test]
async fn test_csv_row_with_extra_fields_is_reported() {
    let server = spawn_portal(data_dir()).await;

    let part = multipart::Part::bytes(b"a,b,c\n1,2,3,4\n".to_vec()).file_name("extra.csv");
    let resp = server
        .client
        .post(server.url("/hr-analytics/upload"))
        .multipart(multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("expected 3 fields in line 2, saw 4"));
    assert!(!body.contains("DataFrame: extra.csv"));
}

#[tokio::test]
async fn test_template_download() {
    let server = spawn_portal(data_dir()).await;

    let resp = server.client.get(server.url("/hr-analytics/template")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    write_xlsx(
        &Table::new(["Employee", "Department"]),
        &server.data_dir.path().join(files::HR_TEMPLATE),
    )
    .unwrap();

    let resp = server.client.get(server.url("/hr-analytics/template")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("template.xlsx")
    );
    assert!(!resp.bytes().await.unwrap().is_empty());
}
