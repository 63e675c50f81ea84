//! Media download through the Bot API file endpoint.

use intake_core::{IntakeError, Result};
use teloxide::prelude::*;
use tracing::{debug, instrument};

/// Resolves `file_id` with `getFile` and fetches the bytes from
/// `<api_url>/file/bot<token>/<file_path>`. The whole file is buffered in memory.
#[instrument(skip(bot))]
pub async fn download_file(bot: &teloxide::Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot
        .get_file(file_id)
        .await
        .map_err(|e| IntakeError::Download(format!("getFile failed: {}", e)))?;

    let api_url = bot.api_url();
    let url = format!(
        "{}/file/bot{}/{}",
        api_url.as_str().trim_end_matches('/'),
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url)
        .await
        .map_err(|e| IntakeError::Download(e.without_url().to_string()))?;
    if !response.status().is_success() {
        return Err(IntakeError::Download(format!(
            "failed to download file: HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| IntakeError::Download(e.without_url().to_string()))?
        .to_vec();
    debug!(bytes = bytes.len(), "File downloaded");
    Ok(bytes)
}
