use serde::Serialize;
use shared::StockReport;
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::Result;

const ENDPOINT: &str = "/stock-report";

pub async fn list(api: &ApiClient) -> Result<Vec<StockReport>> {
    let reports: Vec<StockReport> = api.get_json(ENDPOINT).await?;
    info!(count = reports.len(), "Api list stock reports");
    Ok(reports)
}

pub async fn get(api: &ApiClient, id: &str) -> Result<StockReport> {
    api.get_json(&format!("{ENDPOINT}/{id}")).await
}

pub async fn create<B: Serialize + ?Sized>(api: &ApiClient, report: &B) -> Result<StockReport> {
    let report: StockReport = api.post_json(ENDPOINT, report).await?;
    info!(id = %report.id, "Api create stock report");
    Ok(report)
}

pub async fn pdf(api: &ApiClient, id: &str) -> Result<Vec<u8>> {
    let content = api.get_bytes(&format!("{ENDPOINT}/{id}/pdf")).await?;
    info!(id, size = content.len(), "Api download stock report pdf");
    Ok(content)
}
