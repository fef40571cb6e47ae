pub mod api;
pub mod data_fetcher;
pub mod models;
pub mod ui;
