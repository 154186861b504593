use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::CmsError;
use super::query::{build_url, CmsQuery, Filter, Populate, Relation};
use crate::core::config::CmsConfig;
use crate::shared::constants::ORDER_ASC;

/// HTTP client for the CMS REST API
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent("BeiCapelliWeb/1.0")
            .timeout(config.timeout)
            .build()
            .map_err(|e| CmsError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Base URL used to absolutize media paths
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and return the raw JSON document
    pub async fn get(&self, endpoint: &str, query: &CmsQuery) -> Result<Value, CmsError> {
        let url = build_url(&self.base_url, endpoint, query)?;
        tracing::debug!("CMS GET {}", url);

        let mut request = self.http.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("CMS request to {} failed: {:?}", endpoint, e);
            CmsError::Request {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("CMS returned status {} for {}", status, endpoint);
            return Err(CmsError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!("Failed to parse CMS response for {}: {:?}", endpoint, e);
            CmsError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Fetch, unwrap the `data` envelope and reject empty payloads
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &CmsQuery,
        content_type: &str,
    ) -> Result<T, CmsError> {
        let document = self.get(endpoint, query).await?;
        let data = extract_data(document);

        if is_empty_payload(&data) {
            return Err(CmsError::EmptyResponse {
                content_type: content_type.to_string(),
            });
        }

        decode(endpoint, data)
    }

    /// Fetch a single-type section together with its ordered collection items
    pub async fn fetch_section_with_items<S, I>(
        &self,
        section_endpoint: &str,
        items_endpoint: &str,
        populate_field: &str,
        content_type: &str,
    ) -> Result<(S, Vec<I>), CmsError>
    where
        S: DeserializeOwned,
        I: DeserializeOwned,
    {
        let section_query = CmsQuery::new();
        let items_query = CmsQuery::new().populate(populate_field).sort(ORDER_ASC);
        let items_content_type = format!("{} items", content_type);

        tokio::try_join!(
            self.fetch_data::<S>(section_endpoint, &section_query, content_type),
            self.fetch_data::<Vec<I>>(items_endpoint, &items_query, &items_content_type),
        )
    }

    /// Look up a generic page by slug; `None` when no page matches
    pub async fn find_page_by_slug<T: DeserializeOwned>(
        &self,
        slug: &str,
    ) -> Result<Option<T>, CmsError> {
        if slug.trim().is_empty() {
            return Ok(None);
        }

        let query = page_query(slug);
        let document = self.get("/pages", &query).await?;

        match extract_data(document) {
            Value::Array(mut items) if !items.is_empty() => {
                decode("/pages", items.swap_remove(0)).map(Some)
            }
            _ => Ok(None),
        }
    }
}

fn page_query(slug: &str) -> CmsQuery {
    CmsQuery::new()
        .filter("slug", Filter::eq(slug))
        .populate(Populate::relations([
            ("sections", Relation::populate("*")),
            (
                "seo",
                Relation::populate(Populate::relations([("shareImage", Relation::All)])),
            ),
        ]))
}

/// Unwrap `{ data, meta }` and flatten `{ id, attributes }` entities
fn extract_data(document: Value) -> Value {
    let data = match document {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    match data {
        Value::Array(items) => Value::Array(items.into_iter().map(flatten_entity).collect()),
        other => flatten_entity(other),
    }
}

fn flatten_entity(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("attributes") {
            Some(Value::Object(attributes)) => {
                let mut flat = Map::new();
                if let Some(id) = map.remove("id") {
                    flat.insert("id".to_string(), id);
                }
                flat.extend(attributes);
                Value::Object(flat)
            }
            Some(other) => {
                map.insert("attributes".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, CmsError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!("Unexpected CMS payload shape for {}: {}", endpoint, e);
        CmsError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{spawn_fake_cms, test_cms_config};
    use axum::{
        extract::RawQuery,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Footer {
        title: String,
    }

    #[derive(Debug, Deserialize)]
    struct Card {
        title: String,
    }

    #[test]
    fn test_extract_data_flattens_attributes() {
        let document = json!({
            "data": [{ "id": 1, "attributes": { "slug": "about", "title": "About" } }],
            "meta": {}
        });
        assert_eq!(
            extract_data(document),
            json!([{ "id": 1, "slug": "about", "title": "About" }])
        );
    }

    #[test]
    fn test_empty_payloads() {
        assert!(is_empty_payload(&json!(null)));
        assert!(is_empty_payload(&json!({})));
        assert!(is_empty_payload(&json!([])));
        assert!(!is_empty_payload(&json!({ "id": 1 })));
    }

    #[test]
    fn test_page_query_pairs() {
        let pairs = page_query("privacy").to_pairs();
        assert!(pairs.contains(&("filters[slug]".to_string(), "privacy".to_string())));
        assert!(pairs.contains(&("populate[sections][populate]".to_string(), "*".to_string())));
        assert!(pairs.contains(&(
            "populate[seo][populate][shareImage]".to_string(),
            "true".to_string()
        )));
    }

    #[tokio::test]
    async fn test_fetch_data_sends_token_and_unwraps() {
        let router = Router::new().route(
            "/api/footer",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret-token");
                if authorized {
                    (StatusCode::OK, Json(json!({ "data": { "title": "Footer" } })))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no token" })))
                }
            }),
        );
        let base = spawn_fake_cms(router).await;

        let mut config = test_cms_config(&base);
        config.api_token = Some("secret-token".to_string());
        let client = CmsClient::new(&config).unwrap();

        let footer: Footer = client
            .fetch_data("/footer", &CmsQuery::new(), "footer")
            .await
            .unwrap();
        assert_eq!(footer.title, "Footer");
    }

    #[tokio::test]
    async fn test_fetch_data_reports_status_and_empty() {
        let router = Router::new()
            .route(
                "/api/missing",
                get(|| async { (StatusCode::NOT_FOUND, "nope") }),
            )
            .route(
                "/api/empty",
                get(|| async { Json(json!({ "data": null })) }),
            );
        let base = spawn_fake_cms(router).await;
        let client = CmsClient::new(&test_cms_config(&base)).unwrap();

        let err = client
            .fetch_data::<Footer>("/missing", &CmsQuery::new(), "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::Status { status: 404, .. }));

        let err = client
            .fetch_data::<Footer>("/empty", &CmsQuery::new(), "footer")
            .await
            .unwrap_err();
        assert!(err.is_empty_response());
        assert!(err.to_string().contains("footer content exists"));
    }

    #[tokio::test]
    async fn test_fetch_section_with_items_requests_ordered_items() {
        let router = Router::new()
            .route(
                "/api/contact-section",
                get(|| async { Json(json!({ "data": { "title": "Contact" } })) }),
            )
            .route(
                "/api/contact-cards",
                get(|RawQuery(query): RawQuery| async move {
                    let query = query.unwrap_or_default();
                    assert!(query.contains("populate=icon"));
                    assert!(query.contains("sort=order%3Aasc"));
                    Json(json!({ "data": [{ "title": "Phone" }, { "title": "Mail" }] }))
                }),
            );
        let base = spawn_fake_cms(router).await;
        let client = CmsClient::new(&test_cms_config(&base)).unwrap();

        let (section, items): (Card, Vec<Card>) = client
            .fetch_section_with_items("/contact-section", "/contact-cards", "icon", "contact")
            .await
            .unwrap();
        assert_eq!(section.title, "Contact");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "Mail");
    }

    #[tokio::test]
    async fn test_find_page_by_slug() {
        let router = Router::new().route(
            "/api/pages",
            get(|RawQuery(query): RawQuery| async move {
                let query = query.unwrap_or_default();
                if query.contains("filters%5Bslug%5D=about") {
                    Json(json!({ "data": [{ "id": 7, "attributes": { "title": "About" } }] }))
                } else {
                    Json(json!({ "data": [] }))
                }
            }),
        );
        let base = spawn_fake_cms(router).await;
        let client = CmsClient::new(&test_cms_config(&base)).unwrap();

        let page: Option<Footer> = client.find_page_by_slug("about").await.unwrap();
        assert_eq!(page.unwrap().title, "About");

        let page: Option<Footer> = client.find_page_by_slug("unknown").await.unwrap();
        assert!(page.is_none());

        let page: Option<Footer> = client.find_page_by_slug("  ").await.unwrap();
        assert!(page.is_none());
    }
}
