//! Read-only category catalogue

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::gateway::{Method, RemoteGateway};
use crate::models::Category;
use crate::store::{load_list, save_list, LocalStore, CATEGORIES_KEY};

const CATEGORY_ENDPOINT: &str = "/category/";

/// Categories from the cache, fetched once when the cache is empty.
pub async fn load_categories<S, G>(store: &S, gateway: &G) -> Result<Vec<Category>>
where
    S: LocalStore,
    G: RemoteGateway,
{
    if let Some(cached) = load_list::<Category, _>(store, CATEGORIES_KEY).await? {
        if !cached.is_empty() {
            return Ok(cached);
        }
    }
    fetch_categories(store, gateway).await
}

/// Categories from the server, falling back to the cache when unreachable.
pub async fn refresh_categories<S, G>(store: &S, gateway: &G) -> Result<Vec<Category>>
where
    S: LocalStore,
    G: RemoteGateway,
{
    match fetch_categories(store, gateway).await {
        Err(Error::Unreachable(reason)) => {
            warn!(%reason, "Category refresh failed, using cache");
            Ok(load_list(store, CATEGORIES_KEY).await?.unwrap_or_default())
        }
        other => other,
    }
}

async fn fetch_categories<S, G>(store: &S, gateway: &G) -> Result<Vec<Category>>
where
    S: LocalStore,
    G: RemoteGateway,
{
    let response = gateway.request(CATEGORY_ENDPOINT, Method::Get, None).await?;
    let categories: Vec<Category> = response.json::<Option<Vec<Category>>>()?.unwrap_or_default();
    save_list(store, CATEGORIES_KEY, &categories).await?;
    debug!(count = categories.len(), "Categories cached");
    Ok(categories)
}
