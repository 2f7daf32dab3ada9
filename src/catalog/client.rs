//! HTTP client for the external catalog service.
//!
//! Issues `POST {base_url}/v2/catalog/search` with bearer authentication and
//! follows the `cursor` returned by each page until the catalog is exhausted
//! or `max_pages` is reached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CatalogFetcher, CatalogSnapshot, FetchError, FetchRequest, ObjectType, RelatedObject};
use crate::models::{CatalogItem, ItemVariation, Visibility};

const SEARCH_PATH: &str = "/v2/catalog/search";
const VERSION_HEADER: &str = "Catalog-Version";

/// Connection settings for the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogClientConfig {
    /// Service root, e.g. "https://connect.example.com"
    pub base_url: Option<String>,
    /// Bearer token
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// API version sent with every request
    pub api_version: String,
    /// Objects requested per page
    pub page_limit: u32,
    /// Upper bound on pages followed in one fetch
    pub max_pages: u32,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            access_token: None,
            api_version: "2024-01-18".to_string(),
            page_limit: 100,
            max_pages: 50,
        }
    }
}

impl CatalogClientConfig {
    /// Returns true if both the service url and a token are set.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.access_token.is_some()
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    object_types: &'a [ObjectType],
    include_deleted_objects: bool,
    include_related_objects: bool,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SearchResponse {
    objects: Vec<RawObject>,
    related_objects: Vec<RawObject>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawObject {
    #[serde(rename = "type")]
    object_type: String,
    id: String,
    is_deleted: bool,
    present_at_all_locations: Option<bool>,
    item_data: Option<RawItemData>,
    category_data: Option<RawNamed>,
    image_data: Option<RawImageData>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawItemData {
    name: Option<String>,
    description: Option<String>,
    visibility: Option<String>,
    available_online: Option<bool>,
    category_id: Option<String>,
    categories: Vec<RawRef>,
    image_ids: Vec<String>,
    variations: Vec<RawVariation>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawRef {
    id: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawNamed {
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawVariation {
    id: String,
    item_variation_data: Option<RawVariationData>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawVariationData {
    name: Option<String>,
    price_money: Option<RawMoney>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMoney {
    amount: Option<Value>,
}

impl RawObject {
    fn into_related(self) -> Option<RelatedObject> {
        match self.object_type.as_str() {
            "CATEGORY" => {
                let name = self.category_data.and_then(|c| c.name)?;
                Some(RelatedObject::Category { id: self.id, name })
            }
            "IMAGE" => {
                let url = self.image_data.and_then(|i| i.url)?;
                Some(RelatedObject::Image { id: self.id, url })
            }
            _ => None,
        }
    }

    fn into_item(self) -> CatalogItem {
        let data = self.item_data.unwrap_or_default();
        let visibility = data
            .visibility
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Visibility::Public);

        CatalogItem {
            external_id: self.id,
            name: data.name.unwrap_or_default(),
            description: data.description.filter(|d| !d.trim().is_empty()),
            variations: data
                .variations
                .into_iter()
                .map(|v| {
                    let vd = v.item_variation_data.unwrap_or_default();
                    ItemVariation {
                        external_id: v.id,
                        name: vd.name,
                        price_amount: vd.price_money.and_then(|m| m.amount),
                    }
                })
                .collect(),
            image_ref_ids: data.image_ids,
            category_ref_ids: data.categories.into_iter().map(|c| c.id).collect(),
            legacy_category_id: data.category_id,
            is_deleted: self.is_deleted,
            visibility,
            available_online: data.available_online.unwrap_or(true),
            present_at_all_locations: self.present_at_all_locations.unwrap_or(true),
        }
    }
}

/// Fetches the catalog over HTTP.
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    api_version: String,
    max_pages: u32,
}

impl HttpCatalogFetcher {
    /// Creates a fetcher from config.
    ///
    /// Returns an error if the service url or token is missing.
    pub fn from_config(config: &CatalogClientConfig) -> Result<Self, FetchError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| FetchError::NotConfigured("missing base_url".to_string()))?;
        let access_token = config
            .access_token
            .clone()
            .ok_or_else(|| FetchError::NotConfigured("missing access_token".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            api_version: config.api_version.clone(),
            max_pages: config.max_pages.max(1),
        })
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }

    async fn fetch_page(
        &self,
        request: &FetchRequest,
        cursor: Option<String>,
    ) -> Result<SearchResponse, FetchError> {
        let body = SearchRequest {
            object_types: &request.object_types,
            include_deleted_objects: request.include_deleted,
            include_related_objects: request.include_related,
            limit: request.limit,
            cursor,
        };

        let response = self
            .client
            .post(self.search_url())
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header(VERSION_HEADER, &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CatalogSnapshot, FetchError> {
        let mut snapshot = CatalogSnapshot::default();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.fetch_page(request, cursor.take()).await?;
            pages += 1;

            tracing::debug!(
                page = pages,
                objects = page.objects.len(),
                related = page.related_objects.len(),
                "Fetched catalog page"
            );

            for object in page.objects {
                if object.object_type == "ITEM" {
                    snapshot.items.push(object.into_item());
                } else if let Some(related) = object.into_related() {
                    snapshot.related_objects.push(related);
                }
            }
            snapshot.related_objects.extend(
                page.related_objects
                    .into_iter()
                    .filter_map(RawObject::into_related),
            );

            match page.cursor.filter(|c| !c.is_empty()) {
                Some(next) if pages < self.max_pages => cursor = Some(next),
                Some(_) => {
                    tracing::warn!(
                        max_pages = self.max_pages,
                        "Stopped following catalog pages at the configured limit"
                    );
                    break;
                }
                None => break,
            }
        }

        tracing::info!(
            items = snapshot.items.len(),
            related = snapshot.related_objects.len(),
            pages,
            "Catalog fetch complete"
        );

        Ok(snapshot)
    }
}
