use crate::ServerHarness;
use anyhow::Result;

pub async fn upload_evidence(
    server: &ServerHarness,
    api_key: &str,
    filename: &str,
    bytes: &[u8],
) -> Result<reqwest::Response> {
    let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = reqwest::Client::new()
        .post(format!(
            "{}?api_key={}",
            server.url("/tools/upload"),
            api_key
        ))
        .multipart(form)
        .send()
        .await?;
    Ok(response)
}

pub async fn run_tool(
    server: &ServerHarness,
    api_key: &str,
    path: &str,
) -> Result<reqwest::Response> {
    let response = reqwest::Client::new()
        .post(format!("{}?api_key={}", server.url(path), api_key))
        .send()
        .await?;
    Ok(response)
}
