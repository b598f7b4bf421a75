use anyhow::Result;
use forge_integration_tests::{run_tool, upload_evidence, write_stub_tool, ServerHarness};
use serde_json::Value;

const NEVER_CREATED_JOB: &str = "00000000-0000-0000-0000-000000000000";

async fn upload_and_get_job_id(server: &ServerHarness, filename: &str) -> Result<String> {
    let response = upload_evidence(server, &server.api_key, filename, b"evidence bytes").await?;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    Ok(body["job_id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn test_fls_invocation_returns_tool_output() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,forge_server=debug")
        .try_init()
        .ok();

    let server = ServerHarness::start_with(|config, dir| {
        let stub = write_stub_tool(dir, "stub_fls", "#!/bin/sh\necho \"r/r 4: $2\"\n").unwrap();
        config.tools.fls.binary = stub.to_string_lossy().into_owned();
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    let response = run_tool(&server, &server.api_key, &format!("/tools/tsk/{job_id}/fls")).await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert!(body["stdout"].as_str().unwrap().contains("image.dd"));
    assert_eq!(body["stderr"], "");
    assert_eq!(body["rc"], 0);
    Ok(())
}

#[tokio::test]
async fn test_volatility_invocation_returns_tool_output() -> Result<()> {
    let server = ServerHarness::start_with(|config, dir| {
        let stub = write_stub_tool(
            dir,
            "stub_vol",
            "#!/bin/sh\necho \"PID   NAME\"\necho \"4     System ($1 $2 $3)\"\n",
        )
        .unwrap();
        config.tools.volatility.binary = stub.to_string_lossy().into_owned();
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "memory.raw").await?;
    let response = run_tool(
        &server,
        &server.api_key,
        &format!("/tools/volatility/{job_id}/pslist"),
    )
    .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    let stdout = body["stdout"].as_str().unwrap();
    assert!(stdout.contains("pslist -f"));
    assert!(stdout.contains("memory.raw"));
    assert_eq!(body["rc"], 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_api_key_spawns_nothing() -> Result<()> {
    let server = ServerHarness::start_with(|config, dir| {
        let stub = write_stub_tool(
            dir,
            "stub_fls",
            "#!/bin/sh\ntouch \"$(dirname \"$0\")/fls-invoked\"\n",
        )
        .unwrap();
        config.tools.fls.binary = stub.to_string_lossy().into_owned();
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    let response = run_tool(&server, "wrong-key", &format!("/tools/tsk/{job_id}/fls")).await?;

    assert_eq!(response.status(), 401);
    assert!(!server.temp_path().join("fls-invoked").exists());
    Ok(())
}

#[tokio::test]
async fn test_unknown_job_returns_404() -> Result<()> {
    let server = ServerHarness::start().await?;

    let response = run_tool(
        &server,
        &server.api_key,
        &format!("/tools/tsk/{NEVER_CREATED_JOB}/fls"),
    )
    .await?;

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await?;
    assert_eq!(body["detail"], "job not found");
    Ok(())
}

#[tokio::test]
async fn test_empty_job_returns_400() -> Result<()> {
    let server = ServerHarness::start().await?;

    std::fs::create_dir_all(server.job_root().join(NEVER_CREATED_JOB))?;
    let response = run_tool(
        &server,
        &server.api_key,
        &format!("/tools/volatility/{NEVER_CREATED_JOB}/pslist"),
    )
    .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["detail"], "no evidence uploaded");
    Ok(())
}

#[tokio::test]
async fn test_multiple_evidence_files_return_400() -> Result<()> {
    let server = ServerHarness::start().await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    std::fs::write(server.job_root().join(&job_id).join("second.dd"), b"x")?;

    let response = run_tool(&server, &server.api_key, &format!("/tools/tsk/{job_id}/fls")).await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["detail"], "job contains multiple evidence files");
    Ok(())
}

#[tokio::test]
async fn test_missing_binary_returns_501() -> Result<()> {
    let server = ServerHarness::start_with(|config, _| {
        config.tools.fls.binary = "fls-not-installed-anywhere".to_string();
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    let response = run_tool(&server, &server.api_key, &format!("/tools/tsk/{job_id}/fls")).await?;

    assert_eq!(response.status(), 501);
    let body: Value = response.json().await?;
    assert!(body["detail"].as_str().unwrap().contains("not installed"));
    Ok(())
}

#[tokio::test]
async fn test_timeout_returns_504_without_partial_output() -> Result<()> {
    let server = ServerHarness::start_with(|config, dir| {
        let stub = write_stub_tool(dir, "slow_fls", "#!/bin/sh\necho partial\nsleep 5\n").unwrap();
        config.tools.fls.binary = stub.to_string_lossy().into_owned();
        config.tools.fls.timeout_seconds = 1;
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    let response = run_tool(&server, &server.api_key, &format!("/tools/tsk/{job_id}/fls")).await?;

    assert_eq!(response.status(), 504);
    let body: Value = response.json().await?;
    assert_eq!(body["detail"], "tool timeout");
    assert!(body.get("stdout").is_none());
    Ok(())
}

#[tokio::test]
async fn test_nonzero_exit_is_passed_through() -> Result<()> {
    let server = ServerHarness::start_with(|config, dir| {
        let stub = write_stub_tool(
            dir,
            "failing_fls",
            "#!/bin/sh\necho \"cannot determine file system type\" >&2\nexit 1\n",
        )
        .unwrap();
        config.tools.fls.binary = stub.to_string_lossy().into_owned();
    })
    .await?;

    let job_id = upload_and_get_job_id(&server, "image.dd").await?;
    let response = run_tool(&server, &server.api_key, &format!("/tools/tsk/{job_id}/fls")).await?;

    // Raw tool results are the caller's to interpret; a failing tool is
    // still a successful invocation.
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["rc"], 1);
    assert!(body["stderr"]
        .as_str()
        .unwrap()
        .contains("cannot determine file system type"));
    Ok(())
}
