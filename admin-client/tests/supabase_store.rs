// admin-client/tests/supabase_store.rs
// REST store against a fake PostgREST server

use std::sync::Arc;

use admin_client::{ClientConfig, ClientError, LinkCreate, LinkStore, LinkUpdate, SupabaseStore};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::{Value, json};
use shared::{SortOrderItem, ViewParams};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Option<Value>,
}

#[derive(Default)]
struct FakeRest {
    requests: Mutex<Vec<Recorded>>,
    reject_rpc: Mutex<bool>,
}

impl FakeRest {
    fn last(&self) -> Recorded {
        self.requests.lock().last().cloned().unwrap()
    }
}

fn row(id: i64, title: &str, order: Option<i64>) -> Value {
    json!({
        "id": id,
        "title": title,
        "url": format!("https://example.com/{id}"),
        "image": null,
        "description": null,
        "order": order,
        "active": true,
        "created_at": "2024-05-01T10:00:00+00:00"
    })
}

async fn handle(
    State(fake): State<Arc<FakeRest>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().unwrap_or_default().to_string();
    fake.requests.lock().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        headers: headers.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    match (method, path.as_str()) {
        (Method::GET, "/rest/v1/links") if headers.contains_key(header::RANGE) => (
            StatusCode::PARTIAL_CONTENT,
            [(header::CONTENT_RANGE, "20-21/42")],
            axum::Json(json!([row(21, "U", Some(2100)), row(22, "V", Some(2200))])),
        )
            .into_response(),
        (Method::GET, "/rest/v1/links") => axum::Json(json!([
            row(2, "B", Some(100)),
            row(1, "A", Some(200)),
            row(3, "C", None)
        ]))
        .into_response(),
        (Method::POST, "/rest/v1/links") => {
            let mut created = serde_json::from_slice::<Value>(&body).unwrap_or_default();
            created["id"] = json!(10);
            (StatusCode::CREATED, axum::Json(json!([created]))).into_response()
        }
        (Method::PATCH, "/rest/v1/links") if query.contains("id=eq.404") => {
            axum::Json(json!([])).into_response()
        }
        (Method::PATCH, "/rest/v1/links") => {
            let mut updated = row(5, "E", Some(500));
            if let Ok(Value::Object(patch)) = serde_json::from_slice::<Value>(&body) {
                for (k, v) in patch {
                    updated[k] = v;
                }
            }
            axum::Json(json!([updated])).into_response()
        }
        (Method::DELETE, "/rest/v1/links") if query.contains("id=eq.1") => {
            axum::Json(json!([row(1, "A", Some(200))])).into_response()
        }
        (Method::DELETE, "/rest/v1/links") => axum::Json(json!([])).into_response(),
        (Method::POST, "/rest/v1/rpc/reorder_links") if *fake.reject_rpc.lock() => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "code": "P0001",
                "message": "unknown link id 99",
                "details": null
            })),
        )
            .into_response(),
        (Method::POST, "/rest/v1/rpc/reorder_links") => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Spawn the fake server and a store pointed at it
async fn start() -> (Arc<FakeRest>, SupabaseStore) {
    let fake = Arc::new(FakeRest::default());
    let app = Router::new().fallback(handle).with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(format!("http://{addr}"), "anon-key").with_timeout(5);
    (fake, SupabaseStore::new(&config).unwrap())
}

fn header_value(recorded: &Recorded, name: &str) -> String {
    recorded
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_list_requests_order_and_sends_keys() {
    let (fake, store) = start().await;
    let links = store.list_items().await.unwrap();

    assert_eq!(links.iter().map(|l| l.id).collect::<Vec<_>>(), vec![2, 1, 3]);
    assert_eq!(links[2].order, None);
    assert!(links[0].created_at.is_some());

    let req = fake.last();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.query, "select=*&order=order.asc.nullslast,id.asc");
    assert_eq!(header_value(&req, "apikey"), "anon-key");
    assert_eq!(header_value(&req, "authorization"), "Bearer anon-key");
}

#[tokio::test]
async fn test_access_token_replaces_bearer() {
    let fake = Arc::new(FakeRest::default());
    let app = Router::new().fallback(handle).with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(format!("http://{addr}"), "anon-key").with_token("user-jwt");
    let store = SupabaseStore::new(&config).unwrap();
    store.list_items().await.unwrap();

    let req = fake.last();
    assert_eq!(header_value(&req, "apikey"), "anon-key");
    assert_eq!(header_value(&req, "authorization"), "Bearer user-jwt");
}

#[tokio::test]
async fn test_list_page_uses_range_and_content_range_total() {
    let (fake, store) = start().await;
    let params = ViewParams::default().with_search("club").with_page(2);
    let page = store.list_page(&params).await.unwrap();

    assert_eq!(page.total, Some(42));
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 2);
    assert!(page.has_next());

    let req = fake.last();
    assert_eq!(header_value(&req, "range"), "20-39");
    assert_eq!(header_value(&req, "prefer"), "count=exact");
    assert!(req.query.contains("title=ilike.*club*"));
}

#[tokio::test]
async fn test_create_posts_fields_and_returns_row() {
    let (fake, store) = start().await;
    let created = store
        .create_item(&LinkCreate {
            title: "Tickets".to_string(),
            url: "https://example.com/tickets".to_string(),
            order: Some(400),
            active: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, 10);
    assert_eq!(created.order, Some(400));

    let req = fake.last();
    assert_eq!(req.method, Method::POST);
    assert_eq!(header_value(&req, "prefer"), "return=representation");
    let body = req.body.unwrap();
    assert_eq!(body["title"], "Tickets");
    assert_eq!(body["order"], 400);
}

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let (fake, store) = start().await;
    let updated = store.update_item(5, &LinkUpdate::active(false)).await.unwrap();
    assert!(!updated.active);

    let req = fake.last();
    assert_eq!(req.method, Method::PATCH);
    assert_eq!(req.query, "id=eq.5");
    assert_eq!(req.body.unwrap(), json!({ "active": false }));
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let (_, store) = start().await;
    let err = store
        .update_item(404, &LinkUpdate::active(true))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_reports_whether_row_existed() {
    let (fake, store) = start().await;
    assert!(store.delete_item(1).await.unwrap());
    assert_eq!(fake.last().query, "id=eq.1");
    assert!(!store.delete_item(2).await.unwrap());
}

#[tokio::test]
async fn test_batch_reorder_calls_rpc_once() {
    let (fake, store) = start().await;
    store
        .batch_reorder(&[SortOrderItem::new(3, 100), SortOrderItem::new(1, 200)])
        .await
        .unwrap();

    let requests = fake.requests.lock().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/rest/v1/rpc/reorder_links");
    assert_eq!(
        requests[0].body.clone().unwrap(),
        json!({ "items": [{ "id": 3, "order": 100 }, { "id": 1, "order": 200 }] })
    );
}

#[tokio::test]
async fn test_empty_reorder_skips_network() {
    let (fake, store) = start().await;
    store.batch_reorder(&[]).await.unwrap();
    assert!(fake.requests.lock().is_empty());
}

#[tokio::test]
async fn test_rejected_reorder_surfaces_rest_error() {
    let (fake, store) = start().await;
    *fake.reject_rpc.lock() = true;

    let err = store
        .batch_reorder(&[SortOrderItem::new(99, 100)])
        .await
        .unwrap_err();
    let ClientError::Validation(message) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(message.contains("P0001"));
    assert!(message.contains("unknown link id 99"));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("http://{addr}"), "anon-key").with_timeout(2);
    let store = SupabaseStore::new(&config).unwrap();
    let err = store.list_items().await.unwrap_err();
    assert!(err.is_transport());
}
