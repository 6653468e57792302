//! Link store backed by the hosted PostgREST API

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use shared::models::BatchSortOrderRequest;
use shared::request::SortDirection;
use shared::{Link, LinkCreate, LinkUpdate, Page, SortOrderItem, ViewParams};

use super::LinkStore;
use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

/// Columns a list screen may sort by
const SORTABLE_COLUMNS: &[&str] = &["order", "title", "created_at", "id"];

/// REST-backed [`LinkStore`]
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    http: HttpClient,
    table: String,
    reorder_rpc: String,
}

impl SupabaseStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_client(
            HttpClient::new(config)?,
            &config.links_table,
            &config.reorder_rpc,
        ))
    }

    pub fn with_client(http: HttpClient, table: &str, reorder_rpc: &str) -> Self {
        Self {
            http,
            table: table.to_string(),
            reorder_rpc: reorder_rpc.to_string(),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn single_row(rows: Vec<Link>, id: i64) -> ClientResult<Link> {
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(format!("link {id}")))
    }
}

/// `order` query parameter for a view; `id` is always the final tie-break
fn order_clause(params: &ViewParams) -> String {
    let column = if SORTABLE_COLUMNS.contains(&params.sort_by.as_str()) {
        params.sort_by.as_str()
    } else {
        "order"
    };
    let nulls = match params.direction {
        SortDirection::Asc => "nullslast",
        SortDirection::Desc => "nullsfirst",
    };
    if column == "id" {
        format!("id.{}", params.direction.as_str())
    } else {
        format!("{column}.{}.{nulls},id.asc", params.direction.as_str())
    }
}

/// `ilike` filter on the title.
///
/// LIKE metacharacters are backslash-escaped so they match literally, `*`
/// (PostgREST's wildcard) is dropped, and the rest is percent-encoded.
fn search_filter(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len());
    for c in term.trim().chars() {
        match c {
            '*' => {}
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    format!(
        "title=ilike.*{}*",
        utf8_percent_encode(&pattern, NON_ALPHANUMERIC)
    )
}

#[async_trait]
impl LinkStore for SupabaseStore {
    async fn list_items(&self) -> ClientResult<Vec<Link>> {
        let query = format!("select=*&order={}", order_clause(&ViewParams::default()));
        self.http.select(&self.table, &query).await
    }

    async fn list_page(&self, params: &ViewParams) -> ClientResult<Page<Link>> {
        let mut query = format!("select=*&order={}", order_clause(params));
        if let Some(term) = params.search_term() {
            query.push('&');
            query.push_str(&search_filter(term));
        }
        let (from, to) = params.range();
        let ranged = self
            .http
            .select_range::<Link>(&self.table, &query, from, to)
            .await?;
        Ok(Page::new(ranged.rows, ranged.total, params))
    }

    async fn create_item(&self, fields: &LinkCreate) -> ClientResult<Link> {
        let rows: Vec<Link> = self.http.insert(&self.table, fields).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no row".to_string()))
    }

    async fn update_item(&self, id: i64, fields: &LinkUpdate) -> ClientResult<Link> {
        let rows = self
            .http
            .update(&self.table, &format!("id=eq.{id}"), fields)
            .await?;
        Self::single_row(rows, id)
    }

    async fn delete_item(&self, id: i64) -> ClientResult<bool> {
        let rows: Vec<Link> = self.http.delete(&self.table, &format!("id=eq.{id}")).await?;
        Ok(!rows.is_empty())
    }

    async fn batch_reorder(&self, pairs: &[SortOrderItem]) -> ClientResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        let body = BatchSortOrderRequest {
            items: pairs.to_vec(),
        };
        self.http.rpc(&self.reorder_rpc, &body).await
    }
}
