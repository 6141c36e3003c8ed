use crate::render::GenError;

/// Downloads the source photo. Not retried; the client carries the
/// User-Agent and timeout, so a slow or dead host fails here.
pub async fn download_image(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, GenError> {
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| GenError::Fetch(format!("request to {url} failed: {e}")))?
        .error_for_status()
        .map_err(|e| GenError::Fetch(e.to_string()))?;

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| GenError::Fetch(format!("reading body from {url} failed: {e}")))?;

    Ok(bytes.to_vec())
}
