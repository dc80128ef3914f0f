//! 画面コンポーネント

pub mod csv_panel;
pub mod delete_confirm;
pub mod edit_item_modal;
pub mod header;
pub mod inventory_view;
pub mod item_form;
pub mod notice_area;
pub mod product_search;
pub mod scan_panel;
pub mod stock_chart;
pub mod threshold_panel;
pub mod upc_form;
pub mod upc_view;
