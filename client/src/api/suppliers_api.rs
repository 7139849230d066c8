use serde::Serialize;
use shared::Supplier;
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::Result;

const ENDPOINT: &str = "/supplier";

pub async fn list(api: &ApiClient) -> Result<Vec<Supplier>> {
    let suppliers: Vec<Supplier> = api.get_json(ENDPOINT).await?;
    info!(count = suppliers.len(), "Api list suppliers");
    Ok(suppliers)
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Supplier> {
    api.get_json(&format!("{ENDPOINT}/{id}")).await
}

pub async fn create<B: Serialize + ?Sized>(api: &ApiClient, supplier: &B) -> Result<Supplier> {
    let supplier: Supplier = api.post_json(ENDPOINT, supplier).await?;
    info!(id = %supplier.id, "Api create supplier");
    Ok(supplier)
}

pub async fn update<B: Serialize + ?Sized>(
    api: &ApiClient,
    id: &str,
    supplier: &B,
) -> Result<Supplier> {
    let supplier = api.put_json(&format!("{ENDPOINT}/{id}"), supplier).await?;
    info!(id, "Api update supplier");
    Ok(supplier)
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("{ENDPOINT}/{id}")).await?;
    info!(id, "Api delete supplier");
    Ok(())
}
