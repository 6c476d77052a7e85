use assert_cmd::prelude::*; // assertion traits for std::process::Command
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

const TOKEN_PATH: &str = "/auth/realms/cbam/protocol/openid-connect/token";

async fn start_mock_cbam() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "access_token": "cli-access",
                "refresh_token": "cli-refresh"
            }),
        ))
        .mount(&server)
        .await;
    server
}

async fn write_cli_config(
    dir: &TempDir,
    host: &str,
    catalog_version: &str,
) -> anyhow::Result<std::path::PathBuf> {
    let cfg = serde_yaml::to_string(&serde_json::json!({
        "contexts": {
            "default": {
                "host": host,
                "client_id": "robot",
                "client_secret": "r0b07",
                "catalog_version": catalog_version,
            }
        },
        "current_context": "default"
    }))?;

    let path = dir.path().join("config.yml");
    tokio::fs::write(&path, cfg).await?;
    Ok(path)
}

fn cli(dir: &TempDir, cfg_path: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cbam-cli"));
    cmd.current_dir(dir.path())
        .env("CBAM_CONFIG_PATH", cfg_path)
        .env_remove("HOST")
        .env_remove("CLIENT_ID")
        .env_remove("CLIENT_SECRET")
        .env_remove("CATALOG_VERSION");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_vnf_list_uses_context_connection() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    Mock::given(method("GET"))
        .and(path("/vnflcm/v1/vnf_instances"))
        .and(header("authorization", "Bearer cli-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([
                {
                    "id": "vnf-1",
                    "vnfInstanceName": "edge",
                    "instantiationState": "INSTANTIATED"
                }
            ]),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new()?;
    let cfg_path = write_cli_config(&tmp, &server.uri(), "SOL005").await?;

    cli(&tmp, &cfg_path)
        .args(["vnf", "list", "-o", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnf-1 | edge | INSTANTIATED"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_vnf_find_missing_reports_failure() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    Mock::given(method("GET"))
        .and(path("/vnflcm/v1/vnf_instances"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([])),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new()?;
    let cfg_path = write_cli_config(&tmp, &server.uri(), "SOL005").await?;

    cli(&tmp, &cfg_path)
        .args(["vnf", "find", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "VNF command failed: No VNF with name 'ghost' was found.",
        ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_instantiate_reads_body_file() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    Mock::given(method("POST"))
        .and(path("/vnflcm/v1/vnf_instances/vnf-1/instantiate"))
        .and(header("content-type", "application/json"))
        .and(body_string_contains("\"flavourId\":\"small\""))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new()?;
    let cfg_path = write_cli_config(&tmp, &server.uri(), "SOL005").await?;
    let body_path = tmp.path().join("instantiate.json");
    tokio::fs::write(&body_path, "{\n  \"flavourId\": \"small\"\n}\n").await?;

    cli(&tmp, &cfg_path)
        .args(["vnf", "instantiate", "vnf-1", "-b"])
        .arg(body_path.as_os_str())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Instantiation of VNF 'vnf-1' requested",
        ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_flag_overrides_context_catalog() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    Mock::given(method("POST"))
        .and(path("/api/catalog/adapter/vnfpackages"))
        .and(body_string_contains("filename=\"vnfd.zip\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"id": "pkg-18"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new()?;
    let cfg_path = write_cli_config(&tmp, &server.uri(), "SOL005").await?;
    let zip = tmp.path().join("vnfd.zip");
    tokio::fs::write(&zip, b"PK\x03\x04").await?;

    cli(&tmp, &cfg_path)
        .args(["package", "onboard", "--catalog-version", "v18"])
        .arg(zip.as_os_str())
        .assert()
        .success()
        .stdout(predicate::str::contains("pkg-18"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_missing_package_file_fails_before_connecting()
-> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let cfg_path =
        write_cli_config(&tmp, "http://127.0.0.1:9", "SOL005").await?;

    cli(&tmp, &cfg_path)
        .args(["package", "onboard", "missing.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Package command failed: Package file 'missing.zip' not found",
        ));
    Ok(())
}

#[test]
fn cli_context_round_trip() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let cfg_path = tmp.path().join("config.yml");

    cli(&tmp, &cfg_path)
        .args(["context", "set", "lab", "--host", "cbam.lab"])
        .args(["--client-id", "robot", "--client-secret", "r0b07"])
        .args(["--catalog-version", "v18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ctx:'lab' updated successfully"));

    cli(&tmp, &cfg_path)
        .args(["context", "select", "lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to context 'lab'"));

    cli(&tmp, &cfg_path)
        .args(["context", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"current_context\": \"lab\""))
        .stdout(predicate::str::contains("\"catalog_version\": \"v18\""))
        .stdout(predicate::str::contains("r0b07").not());

    cli(&tmp, &cfg_path)
        .args(["context", "select", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Context command failed: Context 'missing' does not exist",
        ));
    Ok(())
}

#[test]
fn cli_rejects_unknown_catalog_version() {
    let tmp = TempDir::new().unwrap();
    let cfg_path = tmp.path().join("config.yml");

    cli(&tmp, &cfg_path)
        .args(["vnf", "list", "--catalog-version", "SOL006"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such catalog version"));
}

async fn mount_vnf_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vnflcm/v1/vnf_instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{"id": "vnf-9", "vnfInstanceName": "dotenv"}]),
        ))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_reads_connection_from_dotenv_file() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    mount_vnf_listing(&server).await;

    let tmp = TempDir::new()?;
    let cfg_path = tmp.path().join("config.yml");
    let dotenv = format!(
        "HOST={}\nCLIENT_ID=robot\nCLIENT_SECRET=r0b07\n",
        server.uri()
    );
    tokio::fs::write(tmp.path().join(".env"), dotenv).await?;

    cli(&tmp, &cfg_path)
        .args(["vnf", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnf-9"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_dotenv_does_not_override_process_env() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_id=from-shell"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "access_token": "cli-access",
                "refresh_token": "cli-refresh"
            }),
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_vnf_listing(&server).await;

    let tmp = TempDir::new()?;
    let cfg_path = tmp.path().join("config.yml");
    let dotenv = "HOST=http://127.0.0.1:9\nCLIENT_ID=from-file\n";
    tokio::fs::write(tmp.path().join(".env"), dotenv).await?;

    cli(&tmp, &cfg_path)
        .env("HOST", server.uri())
        .env("CLIENT_ID", "from-shell")
        .env("CLIENT_SECRET", "r0b07")
        .args(["vnf", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnf-9"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_runs_without_dotenv_file() -> anyhow::Result<()> {
    let server = start_mock_cbam().await;
    mount_vnf_listing(&server).await;

    let tmp = TempDir::new()?;
    let cfg_path = tmp.path().join("config.yml");

    cli(&tmp, &cfg_path)
        .env("HOST", server.uri())
        .env("CLIENT_ID", "robot")
        .env("CLIENT_SECRET", "r0b07")
        .args(["vnf", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vnf-9"));
    Ok(())
}
