//! サーバーAPI呼び出し

pub mod fetch;

use ammo_inventory_common::{ClientConfig, InventoryClient};

pub use fetch::FetchTransport;

pub type Client = InventoryClient<FetchTransport>;

/// 同一オリジンのAPIクライアント
pub fn client() -> Client {
    let config = ClientConfig::default();
    InventoryClient::with_config(FetchTransport::same_origin(&config), config)
}
