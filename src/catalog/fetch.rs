use std::fs;
use std::path::Path;

use rust_embed::Embed;

use crate::error::LoadError;

#[derive(Embed)]
#[folder = "assets/"]
struct BundledCatalog;

pub fn read_embedded(name: &str) -> Result<String, LoadError> {
    let file = BundledCatalog::get(name).ok_or_else(|| LoadError::MissingAsset(name.to_string()))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

pub fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        origin: path.display().to_string(),
        source,
    })
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<String, LoadError> {
    let fetch_err = |reason: String| LoadError::Fetch {
        origin: url.to_string(),
        reason,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;
    let response = client.get(url).send().map_err(|e| fetch_err(e.to_string()))?;
    if !response.status().is_success() {
        return Err(fetch_err(format!("HTTP error status {}", response.status())));
    }
    response.text().map_err(|e| fetch_err(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str) -> Result<String, LoadError> {
    Err(LoadError::Fetch {
        origin: url.to_string(),
        reason: "built without network support".to_string(),
    })
}
