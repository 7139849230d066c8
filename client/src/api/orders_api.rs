use serde::Serialize;
use shared::{Order, OrderStatusUpdate};
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::Result;

const ENDPOINT: &str = "/order";

pub async fn list(api: &ApiClient) -> Result<Vec<Order>> {
    let orders: Vec<Order> = api.get_json(ENDPOINT).await?;
    info!(count = orders.len(), "Api list orders");
    Ok(orders)
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Order> {
    api.get_json(&format!("{ENDPOINT}/{id}")).await
}

pub async fn create<B: Serialize + ?Sized>(api: &ApiClient, order: &B) -> Result<Order> {
    let order: Order = api.post_json(ENDPOINT, order).await?;
    info!(id = %order.id, "Api create order");
    Ok(order)
}

pub async fn update_status(api: &ApiClient, id: &str, status: &str) -> Result<Order> {
    let payload = OrderStatusUpdate {
        status: status.to_owned(),
    };
    let order = api
        .patch_json(&format!("{ENDPOINT}/{id}/status"), &payload)
        .await?;
    info!(id, status, "Api update order status");
    Ok(order)
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("{ENDPOINT}/{id}")).await?;
    info!(id, "Api delete order");
    Ok(())
}

/// PDF export rendered by the server.
pub async fn pdf(api: &ApiClient, id: &str) -> Result<Vec<u8>> {
    let content = api.get_bytes(&format!("{ENDPOINT}/{id}/pdf")).await?;
    info!(id, size = content.len(), "Api download order pdf");
    Ok(content)
}
