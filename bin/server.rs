// Item Resolver - Web Server
// REST API with Axum: resolve free-form queries against the SQLite catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use item_resolver::{
    find_by_name, init_logging, resolve, resolve_text, search_names, Category, Config, Family,
    ResolveError, Selection, SqliteCatalog, MAX_QUERY_LEN, MIN_QUERY_LEN, SEARCH_LIMIT,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    catalog: SqliteCatalog,
    max_selectable: usize,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct ResolveParams {
    q: String,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

#[derive(Serialize)]
struct SearchItem {
    name: String,
}

/// Resolution response
#[derive(Serialize)]
struct ResolveResponse {
    category: Category,
    outcome: &'static str,
    /// Empty when the outcome is too_many
    names: Vec<String>,
    total: usize,
}

impl ResolveResponse {
    fn new(category: Category, names: Vec<String>, max_selectable: usize) -> Self {
        let total = names.len();
        match Selection::from_names(names, max_selectable) {
            Selection::NotFound => Self::build(category, "not_found", Vec::new(), total),
            Selection::Single(name) => Self::build(category, "single", vec![name], total),
            Selection::Choose(names) => Self::build(category, "choose", names, total),
            Selection::TooMany(_) => Self::build(category, "too_many", Vec::new(), total),
        }
    }

    fn build(category: Category, outcome: &'static str, names: Vec<String>, total: usize) -> Self {
        Self {
            category,
            outcome,
            names,
            total,
        }
    }
}

#[derive(Serialize)]
struct FamilyCount {
    family: Family,
    rows: i64,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(message))).into_response()
}

fn check_length(query: &str) -> Result<(), Response> {
    let len = query.trim().chars().count();
    if (MIN_QUERY_LEN..=MAX_QUERY_LEN).contains(&len) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "query must be {}..={} characters, got {}",
                MIN_QUERY_LEN, MAX_QUERY_LEN, len
            ),
        ))
    }
}

fn resolve_failure(query: &str, err: ResolveError) -> Response {
    match err {
        ResolveError::MalformedQuery { .. } => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        ResolveError::CatalogUnavailable(_) => {
            warn!("Catalog lookup failed for '{}': {}", query, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/resolve?q=<query> - Classify by prefix and resolve
async fn resolve_query(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Response {
    if let Err(response) = check_length(&params.q) {
        return response;
    }

    match resolve_text(&state.catalog, &params.q) {
        Ok((category, names)) => {
            info!("resolve '{}' -> {} names", params.q, names.len());
            let response = ResolveResponse::new(category, names, state.max_selectable);
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(err) => resolve_failure(&params.q, err),
    }
}

/// GET /api/resolve/:category/:query - Resolve with an explicit category
async fn resolve_in_category(
    State(state): State<AppState>,
    Path((category, query)): Path<(String, String)>,
) -> Response {
    let category = match Category::parse(&category) {
        Some(category) => category,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("unknown category: {}", category),
            )
        }
    };

    // Path already percent-decodes the segment
    if let Err(response) = check_length(&query) {
        return response;
    }

    match resolve(&state.catalog, category, &query) {
        Ok(names) => {
            let response = ResolveResponse::new(category, names, state.max_selectable);
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(err) => resolve_failure(&query, err),
    }
}

/// GET /api/search?q=<words> - Every name containing all words, sorted
async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    if let Err(response) = check_length(&params.q) {
        return response;
    }

    match search_names(&state.catalog, &params.q) {
        Ok(names) if names.len() >= SEARCH_LIMIT => {
            info!("search '{}' -> {} names, rejected", params.q, names.len());
            error_response(
                StatusCode::BAD_REQUEST,
                "Too many items found. Refine your request.",
            )
        }
        Ok(names) => {
            let items: Vec<SearchItem> = names.into_iter().map(|name| SearchItem { name }).collect();
            (StatusCode::OK, Json(ApiResponse::ok(items))).into_response()
        }
        Err(err) => resolve_failure(&params.q, err),
    }
}

/// GET /api/search/:name - Exact lookup of a market name
async fn search_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match find_by_name(&state.catalog, &name) {
        Ok(Some(name)) => (StatusCode::OK, Json(ApiResponse::ok(SearchItem { name }))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("Item [{}] not found", name)),
        Err(err) => resolve_failure(&name, err),
    }
}

/// GET /api/catalog/stats - Row counts per family
async fn catalog_stats(State(state): State<AppState>) -> Response {
    match state.catalog.counts() {
        Ok(counts) => {
            let response: Vec<FamilyCount> = counts
                .into_iter()
                .map(|(family, rows)| FamilyCount { family, rows })
                .collect();
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => {
            warn!("Error getting catalog stats: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/resolve", get(resolve_query))
        .route("/resolve/:category/:query", get(resolve_in_category))
        .route("/search", get(search))
        .route("/search/:name", get(search_by_name))
        .route("/catalog/stats", get(catalog_stats))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config);

    println!("🌐 Item Resolver - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !config.database_path.exists() {
        eprintln!("❌ Database not found at {}", config.database_path.display());
        eprintln!("   Run: item-resolver import <family> <csv>");
        eprintln!("   to import the catalog first.");
        std::process::exit(1);
    }

    let catalog = SqliteCatalog::open(&config.database_path)?;
    println!("✓ Database opened: {}", config.database_path.display());

    let state = AppState {
        catalog,
        max_selectable: config.max_selectable,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;

    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/resolve?q=w+ak-47+redline+ft", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use item_resolver::{
        insert_records, AgentRecord, CatalogRecord, QualitySet, Side, SkinRecord, ToolRecord,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let catalog = SqliteCatalog::open_in_memory().unwrap();
        let records = vec![
            CatalogRecord::Skin(
                SkinRecord::gun("AK-47 | Redline", "Redline", QualitySet::all()).with_stattrak(),
            ),
            CatalogRecord::Agent(AgentRecord {
                side: Side::Ct,
                name: "Lt. Commander Ricksaw | NSWC SEAL".to_string(),
            }),
            CatalogRecord::Tool(ToolRecord {
                name: "Name Tag".to_string(),
            }),
            CatalogRecord::Tool(ToolRecord {
                name: "Sticker Remover".to_string(),
            }),
        ];
        catalog
            .with_connection(|conn| insert_records(conn, &records))
            .unwrap()
            .unwrap();
        AppState {
            catalog,
            max_selectable: 30,
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(build_router(test_state()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_resolve_single() {
        let (status, body) = get_json(
            build_router(test_state()),
            "/api/resolve?q=w%20ak-47%20redline%20ft%20st",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["category"], "weapon");
        assert_eq!(body["data"]["outcome"], "single");
        assert_eq!(
            body["data"]["names"][0],
            "StatTrak™ AK-47 | Redline (Field-Tested)"
        );
    }

    #[tokio::test]
    async fn test_resolve_choose_and_not_found() {
        let app = build_router(test_state());
        let (_, body) = get_json(app.clone(), "/api/resolve?q=t%20e").await;
        assert_eq!(body["data"]["outcome"], "choose");
        assert_eq!(body["data"]["total"], 2);

        let (status, body) = get_json(app, "/api/resolve?q=t%20nothing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "not_found");
    }

    #[tokio::test]
    async fn test_malformed_query_is_bad_request() {
        let (status, body) =
            get_json(build_router(test_state()), "/api/resolve?q=w%20ak-47%20redline").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_query_length_limits() {
        let app = build_router(test_state());
        let (status, _) = get_json(app.clone(), "/api/resolve?q=t").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let long = format!("/api/resolve?q=t%20{}", "a".repeat(120));
        let (status, _) = get_json(app, &long).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resolve_with_explicit_category() {
        let (status, body) =
            get_json(build_router(test_state()), "/api/resolve/agent/ct%20seal").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["names"][0], "Lt. Commander Ricksaw | NSWC SEAL");

        let (status, _) =
            get_json(build_router(test_state()), "/api/resolve/bogus/anything").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_path_query_is_decoded_once() {
        let state = test_state();
        let records = vec![CatalogRecord::Tool(ToolRecord {
            name: "Graffiti %41".to_string(),
        })];
        state
            .catalog
            .with_connection(|conn| insert_records(conn, &records))
            .unwrap()
            .unwrap();

        let (status, body) = get_json(build_router(state), "/api/resolve/tool/%2541").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "single");
        assert_eq!(body["data"]["names"][0], "Graffiti %41");
    }

    #[tokio::test]
    async fn test_search_sorted_by_name() {
        let (status, body) = get_json(build_router(test_state()), "/api/search?q=e%20r").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "AK-47 | Redline",
                "Lt. Commander Ricksaw | NSWC SEAL",
                "Sticker Remover",
            ]
        );
    }

    #[tokio::test]
    async fn test_search_rejects_too_many() {
        let state = test_state();
        let records: Vec<CatalogRecord> = (0..SEARCH_LIMIT)
            .map(|i| {
                CatalogRecord::Tool(ToolRecord {
                    name: format!("Gift Package {:02}", i),
                })
            })
            .collect();
        state
            .catalog
            .with_connection(|conn| insert_records(conn, &records))
            .unwrap()
            .unwrap();
        let app = build_router(state);

        let (status, body) = get_json(app.clone(), "/api/search?q=gift").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Too many items found"));

        let (status, body) = get_json(app, "/api/search?q=gift%20package%2001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Gift Package 01");

        let (status, _) = get_json(build_router(test_state()), "/api/search?q=ab").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_by_exact_name() {
        let app = build_router(test_state());
        let (status, body) = get_json(app.clone(), "/api/search/Name%20Tag").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Name Tag");

        let (status, body) = get_json(app.clone(), "/api/search/name%20tag").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Item [name tag] not found");

        let (status, _) = get_json(app, "/api/search/Unknown%20Item").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_catalog_stats() {
        let (status, body) = get_json(build_router(test_state()), "/api/catalog/stats").await;
        assert_eq!(status, StatusCode::OK);
        let rows: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["rows"].as_i64().unwrap())
            .collect();
        assert_eq!(rows, vec![1, 0, 1, 0, 2]);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_server_error() {
        let state = test_state();
        state
            .catalog
            .with_connection(|conn| conn.execute_batch("DROP TABLE tools"))
            .unwrap()
            .unwrap();

        let (status, body) = get_json(build_router(state), "/api/resolve?q=t%20name").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
