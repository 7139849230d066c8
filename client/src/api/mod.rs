pub mod auth_api;
pub mod orders_api;
pub mod products_api;
pub mod stock_reports_api;
pub mod suppliers_api;
