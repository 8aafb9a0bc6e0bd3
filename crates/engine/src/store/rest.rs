use async_trait::async_trait;
use reqwest::{
    Method, RequestBuilder, Response, Url,
    header::{AUTHORIZATION, CONTENT_RANGE},
};

use crate::{EngineError, ExpensePayload, ExpenseRow, ResultEngine};

use super::{ExpenseStore, StorePage, StoreQuery, TABLE};

/// Record store backed by a PostgREST endpoint (e.g. Supabase).
///
/// The exact total is requested with `Prefer: count=exact` but the server may
/// still answer `*`, in which case [`StorePage::total`] is `None`.
#[derive(Clone, Debug)]
pub struct RestStore {
    http: reqwest::Client,
    table_url: Url,
    key: String,
}

impl RestStore {
    /// `base_url` is the project URL, without the `/rest/v1` suffix.
    pub fn new(base_url: &str, key: &str) -> ResultEngine<Self> {
        let table_url = Url::parse(&format!(
            "{}/rest/v1/{TABLE}",
            base_url.trim_end_matches('/')
        ))
        .map_err(|err| EngineError::Store(format!("invalid store url: {err}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            table_url,
            key: key.to_string(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.key)
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
    }

    fn url_for_id(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        url
    }

    async fn send(&self, request: RequestBuilder) -> ResultEngine<Response> {
        let res = request.send().await.map_err(transport_error)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        tracing::error!("record store answered {status}: {body}");
        Err(EngineError::Store(format!("record store answered {status}")))
    }

    async fn rows(&self, request: RequestBuilder) -> ResultEngine<Vec<ExpenseRow>> {
        self.send(request)
            .await?
            .json::<Vec<ExpenseRow>>()
            .await
            .map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> EngineError {
    EngineError::Store(err.to_string())
}

/// Quote a value for use inside a PostgREST logical filter, `or=(...)`.
fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`.
fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
impl ExpenseStore for RestStore {
    async fn select(&self, query: &StoreQuery) -> ResultEngine<StorePage> {
        let mut url = self.table_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(pattern) = &query.search {
                // `like`/`ilike` read `*` as a wildcard; `imatch` takes the
                // term as an escaped regex instead.
                let value = quote_filter_value(&pattern.regex_pattern());
                pairs.append_pair(
                    "or",
                    &format!("(title.imatch.{value},description.imatch.{value})"),
                );
            }
            let dir = query.sort_order.as_str();
            pairs.append_pair(
                "order",
                &format!("{}.{dir},id.{dir}", query.sort_by.as_str()),
            );
            if let Some(range) = query.range {
                pairs.append_pair("offset", &range.offset.to_string());
                pairs.append_pair("limit", &range.limit.to_string());
            }
        }

        let res = self
            .send(self.request(Method::GET, url).header("Prefer", "count=exact"))
            .await?;
        let total = res
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(content_range_total);
        let rows = res
            .json::<Vec<ExpenseRow>>()
            .await
            .map_err(transport_error)?;

        Ok(StorePage { rows, total })
    }

    async fn find(&self, id: &str) -> ResultEngine<Option<ExpenseRow>> {
        let mut url = self.url_for_id(id);
        url.query_pairs_mut().append_pair("select", "*");
        let rows = self.rows(self.request(Method::GET, url)).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, payload: ExpensePayload) -> ResultEngine<ExpenseRow> {
        let request = self
            .request(Method::POST, self.table_url.clone())
            .header("Prefer", "return=representation")
            .json(&payload);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Store("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        id: &str,
        payload: ExpensePayload,
    ) -> ResultEngine<Option<ExpenseRow>> {
        let request = self
            .request(Method::PATCH, self.url_for_id(id))
            .header("Prefer", "return=representation")
            .json(&payload);
        Ok(self.rows(request).await?.into_iter().next())
    }

    async fn delete(&self, id: &str) -> ResultEngine<u64> {
        let request = self
            .request(Method::DELETE, self.url_for_id(id))
            .header("Prefer", "return=representation");
        let deleted = self
            .send(request)
            .await?
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(transport_error)?;
        Ok(deleted.len() as u64)
    }
}
