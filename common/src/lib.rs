//! Ammo Inventory Common Library
//!
//! CLIとWeb(WASM)で共有される型・APIクライアント・スキャン制御

pub mod types;
pub mod error;
pub mod api;
pub mod transport;
pub mod client;
pub mod lookup;
pub mod mutation;
pub mod scan;
pub mod filter;
pub mod chart;
pub mod csv;
pub mod notice;
pub mod supersede;

pub use types::{
    InventoryForm, InventoryItem, ProductResult, ScanDetection, Thresholds, UpcForm, UpcRecord,
};
pub use error::{Error, ErrorKind, Result};
pub use api::{HttpRequest, HttpResponse, Method, RequestBody};
pub use transport::{ClientConfig, Transport};
pub use client::{InventoryClient, DEFAULT_MAX_PRODUCTS};
pub use lookup::{LookupDraft, LookupOutcome};
pub use mutation::{DeleteConfirmation, ThresholdForm};
pub use scan::{Camera, ScanConfig, ScanSession, ScanState};
pub use filter::{distinct_categories, FilterRow, TableFilter};
pub use chart::{ChartBar, StockLevel};
pub use csv::ImportReport;
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use supersede::{RequestGate, Ticket};
