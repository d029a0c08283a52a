//! Typed operations on remote project content
//!
//! This module wraps the request executor with the project endpoints: fetch
//! content (optionally pinned to a version), replace content, and list the
//! paginated project/deployment collections.

use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::app::client::RequestOptions;
use crate::app::envelope::ResponseEnvelope;
use crate::app::executor::RequestExecutor;
use crate::app::models::{File, FileType};
use crate::app::pages::PaginatedCollector;
use crate::constants::{api, files};
use crate::errors::{ConfigError, ConfigResult};

/// Options for a content fetch
#[derive(Debug, Clone, Default)]
pub struct GetContentOptions {
    /// Bypass the cache read for this fetch
    pub no_cache: bool,
    /// Cache TTL override for this fetch
    pub cache_ttl: Option<std::time::Duration>,
    /// Strip the manifest from the returned data
    ///
    /// Filtering happens after the cache read/write: what gets cached is
    /// always the unfiltered response.
    pub skip_manifest: bool,
    /// Pin the fetch to a specific project version
    pub version_number: Option<u32>,
}

/// Typed get/update operations over a project's content endpoint
#[derive(Debug, Clone)]
pub struct ProjectContentService {
    executor: RequestExecutor,
    base_url: Url,
}

impl ProjectContentService {
    /// Create a service against the default API base URL
    pub fn new(executor: RequestExecutor) -> ConfigResult<Self> {
        Self::with_base_url(executor, api::BASE_URL)
    }

    /// Create a service against a custom API base URL
    pub fn with_base_url(executor: RequestExecutor, base_url: &str) -> ConfigResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { executor, base_url })
    }

    /// Fetch a project's file set
    ///
    /// With `version_number` set, the fetch is pinned to that version via a
    /// query parameter (and caches under its own key, since the key is the
    /// exact URL).
    pub async fn get_content(
        &self,
        script_id: &str,
        options: &GetContentOptions,
    ) -> ConfigResult<ResponseEnvelope> {
        let mut url = self.resource_url(&[api::PROJECTS_RESOURCE, script_id, api::CONTENT_RESOURCE])?;
        if let Some(version) = options.version_number {
            url.query_pairs_mut()
                .append_pair(api::VERSION_PARAM, &version.to_string());
        }

        let mut request = RequestOptions::get().with_no_cache(options.no_cache);
        if let Some(ttl) = options.cache_ttl {
            request = request.with_cache_ttl(ttl);
        }

        let mut envelope = self.executor.execute(&url, request).await;
        if options.skip_manifest {
            strip_manifest(&mut envelope.data);
        }
        Ok(envelope)
    }

    /// Replace a project's file set
    ///
    /// Every field other than name/type/source is stripped from each file
    /// before the body is built, dropping server-computed metadata picked up
    /// from a prior fetch. The PUT implicitly invalidates the content cache
    /// key through the executor.
    pub async fn update_content(
        &self,
        script_id: &str,
        files: &[File],
    ) -> ConfigResult<ResponseEnvelope> {
        let url = self.resource_url(&[api::PROJECTS_RESOURCE, script_id, api::CONTENT_RESOURCE])?;
        let body = json!({ "files": files.iter().map(essential_fields).collect::<Vec<_>>() });

        debug!("updating content of {} with {} file(s)", script_id, files.len());
        Ok(self.executor.execute(&url, RequestOptions::put(body)).await)
    }

    /// List every project visible to the caller, across all pages
    pub async fn list_projects(&self) -> ConfigResult<ResponseEnvelope> {
        let url = self.resource_url(&[api::PROJECTS_RESOURCE])?;
        Ok(self.collector().collect(&url, api::PROJECTS_RESOURCE).await)
    }

    /// List a project's deployments, across all pages
    pub async fn list_deployments(&self, script_id: &str) -> ConfigResult<ResponseEnvelope> {
        let url =
            self.resource_url(&[api::PROJECTS_RESOURCE, script_id, api::DEPLOYMENTS_RESOURCE])?;
        Ok(self
            .collector()
            .collect(&url, api::DEPLOYMENTS_RESOURCE)
            .await)
    }

    fn collector(&self) -> PaginatedCollector {
        PaginatedCollector::new(self.executor.clone())
    }

    fn resource_url(&self, segments: &[&str]) -> ConfigResult<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            segments.join("/")
        );
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

/// Reduce a file to the fields the update endpoint accepts
fn essential_fields(file: &File) -> Value {
    json!({
        "name": file.name,
        "type": file.file_type,
        "source": file.source,
    })
}

/// Remove the manifest entry from a content payload in place
fn strip_manifest(data: &mut Value) {
    if let Some(list) = data.get_mut("files").and_then(Value::as_array_mut) {
        list.retain(|entry| {
            let name = entry.get("name").and_then(Value::as_str);
            let file_type = entry.get("type").and_then(Value::as_str);
            !(name == Some(files::MANIFEST_NAME)
                && file_type == Some(FileType::Json.as_wire_name()))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cache::{CacheGateway, MemoryStore};
    use crate::app::testing::MockFetcher;
    use reqwest::Method;
    use std::sync::Arc;

    fn service(fetcher: MockFetcher) -> ProjectContentService {
        let executor = RequestExecutor::new(
            Arc::new(fetcher),
            CacheGateway::new(Arc::new(MemoryStore::new())),
        );
        ProjectContentService::new(executor).unwrap()
    }

    fn content_payload() -> Value {
        json!({
            "scriptId": "s1",
            "files": [
                {"name": "appsscript", "type": "JSON", "source": "{}"},
                {"name": "main", "type": "SERVER_JS", "source": "function f() {}"},
            ]
        })
    }

    #[tokio::test]
    async fn test_get_content_hits_content_endpoint() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(200, content_payload()));
        let service = service(fetcher.clone());

        let envelope = service
            .get_content("s1", &GetContentOptions::default())
            .await
            .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data["files"].as_array().unwrap().len(), 2);

        let calls = fetcher.calls();
        assert_eq!(calls[0].method, Method::GET);
        assert_eq!(
            calls[0].url.as_str(),
            "https://script.googleapis.com/v1/projects/s1/content"
        );
    }

    #[tokio::test]
    async fn test_version_pin_becomes_query_parameter() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(200, content_payload()));
        let service = service(fetcher.clone());

        let options = GetContentOptions {
            version_number: Some(7),
            ..Default::default()
        };
        service.get_content("s1", &options).await.unwrap();

        assert!(fetcher.calls()[0].url.as_str().contains("versionNumber=7"));
    }

    #[tokio::test]
    async fn test_skip_manifest_filters_returned_data_not_cache() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(200, content_payload()));
        let service = service(fetcher.clone());

        let options = GetContentOptions {
            skip_manifest: true,
            ..Default::default()
        };
        let filtered = service.get_content("s1", &options).await.unwrap();
        let names: Vec<_> = filtered.data["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["main"]);

        // The cache kept the unfiltered response: a plain fetch within TTL
        // is served from cache and still carries the manifest
        let cached = service
            .get_content("s1", &GetContentOptions::default())
            .await
            .unwrap();
        assert!(cached.cached);
        assert_eq!(cached.data["files"].as_array().unwrap().len(), 2);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_update_content_strips_server_metadata() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(200, json!({})));
        let service = service(fetcher.clone());

        let mut file = File::new("main", FileType::ServerJs, "function f() {}");
        file.extra
            .insert("updateTime".to_string(), json!("2024-01-01T00:00:00Z"));

        service.update_content("s1", &[file]).await.unwrap();

        let calls = fetcher.calls();
        assert_eq!(calls[0].method, Method::PUT);
        let sent: Value = serde_json::from_str(calls[0].payload.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent,
            json!({"files": [{"name": "main", "type": "SERVER_JS", "source": "function f() {}"}]})
        );
    }

    #[tokio::test]
    async fn test_update_content_invalidates_cached_content() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(200, content_payload()));
        fetcher.enqueue(ResponseEnvelope::ok(200, json!({})));
        fetcher.enqueue(ResponseEnvelope::ok(200, content_payload()));
        let service = service(fetcher.clone());

        service
            .get_content("s1", &GetContentOptions::default())
            .await
            .unwrap();
        service.update_content("s1", &[]).await.unwrap();

        let after = service
            .get_content("s1", &GetContentOptions::default())
            .await
            .unwrap();
        assert!(!after.cached);
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_list_deployments_walks_pages() {
        let fetcher = MockFetcher::new();
        fetcher.enqueue(ResponseEnvelope::ok(
            200,
            json!({"deployments": [{"id": "d1"}], "nextPageToken": "t1"}),
        ));
        fetcher.enqueue(ResponseEnvelope::ok(200, json!({"deployments": [{"id": "d2"}]})));
        let service = service(fetcher.clone());

        let aggregate = service.list_deployments("s1").await.unwrap();
        assert_eq!(aggregate.data["deployments"].as_array().unwrap().len(), 2);
        assert!(fetcher.calls()[0]
            .url
            .path()
            .ends_with("projects/s1/deployments"));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let executor = RequestExecutor::without_cache(Arc::new(MockFetcher::new()));
        let result = ProjectContentService::with_base_url(executor, "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }
}
