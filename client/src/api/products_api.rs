use serde::Serialize;
use shared::Product;
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::Result;

const ENDPOINT: &str = "/product";

pub async fn list(api: &ApiClient) -> Result<Vec<Product>> {
    let products: Vec<Product> = api.get_json(ENDPOINT).await?;
    info!(count = products.len(), "Api list products");
    Ok(products)
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Product> {
    api.get_json(&format!("{ENDPOINT}/{id}")).await
}

pub async fn create<B: Serialize + ?Sized>(api: &ApiClient, product: &B) -> Result<Product> {
    let product: Product = api.post_json(ENDPOINT, product).await?;
    info!(id = %product.id, "Api create product");
    Ok(product)
}

pub async fn update<B: Serialize + ?Sized>(api: &ApiClient, id: &str, product: &B) -> Result<Product> {
    let product = api.put_json(&format!("{ENDPOINT}/{id}"), product).await?;
    info!(id, "Api update product");
    Ok(product)
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("{ENDPOINT}/{id}")).await?;
    info!(id, "Api delete product");
    Ok(())
}
