//! Video-hosting API client for trailer thumbnail enrichment.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RemoteError, ThumbnailSource};

/// Video-hosting API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// API key (required).
    pub api_key: String,
    /// Base URL (default: https://www.googleapis.com/youtube/v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Video-hosting API client.
pub struct YoutubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(config: YoutubeConfig) -> Result<Self, RemoteError> {
        if config.api_key.is_empty() {
            return Err(RemoteError::NotConfigured(
                "video-hosting API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://www.googleapis.com/youtube/v3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait::async_trait]
impl ThumbnailSource for YoutubeClient {
    async fn thumbnail_url(&self, key: &str) -> Result<String, RemoteError> {
        let url = format!("{}/videos", self.base_url);

        debug!("Thumbnail lookup for key {}", key);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("id", key),
                ("part", "snippet,contentDetails,statistics,status"),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: VideoListResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(format!("malformed video list: {}", e)))?;

        list.items
            .into_iter()
            .next()
            .and_then(|item| item.snippet.thumbnails.medium)
            .map(|t| t.url)
            .ok_or_else(|| {
                RemoteError::ParseError(format!("no medium thumbnail for key {}", key))
            })
    }
}

// ============================================================================
// API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let result = YoutubeClient::new(YoutubeConfig {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 30,
        });
        assert!(matches!(result, Err(RemoteError::NotConfigured(_))));
    }

    #[test]
    fn test_parse_video_list_response() {
        let json = r#"{
            "items": [{
                "snippet": {
                    "thumbnails": {
                        "default": {"url": "https://img.example/default.jpg"},
                        "medium": {"url": "https://img.example/medium.jpg"}
                    }
                }
            }]
        }"#;

        let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(
            parsed.items[0].snippet.thumbnails.medium.as_ref().unwrap().url,
            "https://img.example/medium.jpg"
        );
    }

    #[test]
    fn test_parse_empty_items() {
        let parsed: VideoListResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_parse_missing_medium_thumbnail() {
        let json = r#"{
            "items": [{
                "snippet": {
                    "thumbnails": {
                        "default": {"url": "https://img.example/default.jpg"}
                    }
                }
            }]
        }"#;

        let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.items[0].snippet.thumbnails.medium.is_none());
    }
}
