//! 基于 reqwest 的目录服务客户端

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::CatalogService;
use crate::error::{AppError, Result};
use crate::models::{Algorithm, Game, RecommendationItem};

/// HTTP 目录服务客户端
///
/// 不设置请求超时：过慢的请求会在被新请求取代后由调用方丢弃。
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("steamsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 搜索接口地址，查询文本作为单个路径段编码
    pub fn search_url(&self, query: &str) -> String {
        format!("{}/search/{}", self.base_url, urlencoding::encode(query))
    }

    /// 推荐接口地址
    pub fn recommend_url(&self, algorithm: Algorithm, game_id: u64) -> String {
        format!(
            "{}/recommend/{}/{}",
            self.base_url,
            algorithm.discriminator(),
            game_id
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        debug!(url = %url, bytes = body.len(), "catalog response received");

        serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<Game>> {
        self.get_json(self.search_url(query)).await
    }

    async fn recommend(
        &self,
        algorithm: Algorithm,
        game_id: u64,
    ) -> Result<Vec<RecommendationItem>> {
        self.get_json(self.recommend_url(algorithm, game_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_urls() {
        let client = HttpCatalogClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.search_url("Half Life"),
            "http://localhost:8080/search/Half%20Life"
        );
        assert_eq!(
            client.search_url("a/b?c"),
            "http://localhost:8080/search/a%2Fb%3Fc"
        );
        assert_eq!(
            client.recommend_url(Algorithm::MinHash, 220),
            "http://localhost:8080/recommend/minhash/220"
        );
        assert_eq!(
            client.recommend_url(Algorithm::Default, 7),
            "http://localhost:8080/recommend/global/7"
        );
    }

    #[tokio::test]
    async fn test_search_preserves_service_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/Half"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 70, "name": "Half-Life", "imageURL": "a.jpg" },
                { "id": 220, "name": "Half-Life 2", "imageURL": "b.jpg" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpCatalogClient::new(&server.uri()).unwrap();
        let games = client.search("Half").await.unwrap();
        let ids: Vec<u64> = games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![70, 220]);
    }

    #[tokio::test]
    async fn test_recommend_hits_algorithm_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recommend/cosine/220"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 400, "name": "Portal", "imageURL": "", "score": 0.91, "price": 9.99 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpCatalogClient::new(&server.uri()).unwrap();
        let items = client.recommend(Algorithm::Cosine, 220).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].features().score, 0.91);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recommend/global/1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Game not found"))
            .mount(&server)
            .await;

        let client = HttpCatalogClient::new(&server.uri()).unwrap();
        let err = client.recommend(Algorithm::Default, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 404, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/Portal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "games": [] })))
            .mount(&server)
            .await;

        let client = HttpCatalogClient::new(&server.uri()).unwrap();
        let err = client.search("Portal").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        // 绑定后立即释放端口，保证没有监听者
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpCatalogClient::new(&format!("http://{}", addr)).unwrap();
        let err = client.search("Half").await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
