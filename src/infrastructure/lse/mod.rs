pub mod client;
pub mod html;
pub mod refresh_api;
pub mod table_source;

pub use client::LseWebClient;
pub use refresh_api::{RefreshApiSettings, RefreshApiSource};
pub use table_source::HtmlTableSource;
