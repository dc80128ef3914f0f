//! ammo-inv: 弾薬在庫サーバーの端末クライアント

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
