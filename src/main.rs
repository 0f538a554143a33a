use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use table_query::config::resolve_db_path;
use table_query::infra::http::client::{HttpClient, ODataFetcher};
use table_query::infra::odata::endpoint::{parse_query_params, QueryParams};
use table_query::usecase::services::table_query::{filters_key, pagination_key, sorting_key};
use table_query::{ColumnDef, KeyValueStore, QueryStatus, SqliteStore, TableOptions, TableQuery};

const TOKEN_ENV: &str = "TABLE_QUERY_TOKEN";

const USAGE: &str = "usage:
  table-query list
  table-query show <table-id>
  table-query clear <table-id>
  table-query render <table-id> <columns.json> [endpoint [key=value...]]
  table-query fetch <table-id> <columns.json> <base-url> <endpoint> [key=value...]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let db_path = resolve_db_path()?;
    let store = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open state db: {}", db_path.display()))?,
    );

    match args.as_slice() {
        ["list"] => list_tables(&store),
        ["show", table_id] => show_table(store.as_ref(), table_id),
        ["clear", table_id] => clear_table(store, table_id),
        ["render", table_id, columns] => {
            render_query(store, table_id, Path::new(columns), "", Vec::new())
        }
        ["render", table_id, columns, endpoint, params @ ..] => {
            let params = parse_query_params(params.iter().copied());
            render_query(store, table_id, Path::new(columns), endpoint, params)
        }
        ["fetch", table_id, columns, base_url, endpoint, params @ ..] => {
            let params = parse_query_params(params.iter().copied());
            fetch_page(store, table_id, Path::new(columns), base_url, endpoint, params).await
        }
        _ => bail!("{USAGE}"),
    }
}

fn load_columns(path: &Path) -> Result<Vec<ColumnDef>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read columns: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse columns: {}", path.display()))
}

fn list_tables(store: &SqliteStore) -> Result<()> {
    for (key, value) in store.entries_with_prefix("table-")? {
        println!("{key} = {value}");
    }
    Ok(())
}

fn show_table(store: &dyn KeyValueStore, table_id: &str) -> Result<()> {
    let mut state = serde_json::Map::new();
    for (name, key) in [
        ("pagination", pagination_key(table_id)),
        ("sorting", sorting_key(table_id)),
        ("filters", filters_key(table_id)),
    ] {
        let value = match store.get(&key)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
            None => Value::Null,
        };
        state.insert(name.to_string(), value);
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(state))?);
    Ok(())
}

fn open_table(
    store: Arc<SqliteStore>,
    table_id: &str,
    columns: Vec<ColumnDef>,
    client: Arc<HttpClient>,
    endpoint: &str,
    params: QueryParams,
) -> (TableQuery<Value>, Arc<ODataFetcher<Value>>) {
    let fetcher = Arc::new(ODataFetcher::<Value>::new(client, endpoint).with_params(params));
    let table = TableQuery::new(
        TableOptions::new(table_id),
        columns,
        fetcher.clone(),
        store,
    );
    (table, fetcher)
}

fn clear_table(store: Arc<SqliteStore>, table_id: &str) -> Result<()> {
    let (mut table, _) = open_table(
        store,
        table_id,
        Vec::new(),
        Arc::new(HttpClient::new("")),
        "",
        Vec::new(),
    );
    table.clear_persisted_state();
    println!("cleared persisted state for {table_id}");
    Ok(())
}

fn render_query(
    store: Arc<SqliteStore>,
    table_id: &str,
    columns: &Path,
    endpoint: &str,
    params: QueryParams,
) -> Result<()> {
    let columns = load_columns(columns)?;
    let (table, fetcher) = open_table(
        store,
        table_id,
        columns,
        Arc::new(HttpClient::new("")),
        endpoint,
        params,
    );
    println!("{}", fetcher.endpoint_for(&table.current_request()));
    Ok(())
}

async fn fetch_page(
    store: Arc<SqliteStore>,
    table_id: &str,
    columns: &Path,
    base_url: &str,
    endpoint: &str,
    params: QueryParams,
) -> Result<()> {
    let columns = load_columns(columns)?;
    let mut client = HttpClient::new(base_url);
    client.set_auth_token(std::env::var(TOKEN_ENV).ok());

    let (mut table, _) = open_table(store, table_id, columns, Arc::new(client), endpoint, params);
    table.refresh().await;

    if table.status() == QueryStatus::Error {
        let message = table
            .error()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown error".to_string());
        bail!("fetch failed: {message}");
    }

    let output = json!({
        "pagination": table.pagination(),
        "totalCount": table.total_row_count(),
        "data": table.table_data(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
