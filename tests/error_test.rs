//! エラーケーステスト
//!
//! 共通エラーの分類とCLI側エラーへの変換を検証

use ammo_inventory::commands;
use ammo_inventory::config::Config;
use ammo_inventory::error::AppError;
use ammo_inventory_common::{Error, ErrorKind, InventoryClient, NoticeBoard, NoticeLevel};
use ammo_inventory_common::{HttpRequest, HttpResponse, Transport};
use std::path::Path;
use tempfile::tempdir;

/// 何も送らないことを確認するためのトランスポート
struct Unreachable;

impl Transport for Unreachable {
    async fn send(&self, request: HttpRequest) -> ammo_inventory_common::Result<HttpResponse> {
        panic!("unexpected request to {}", request.path);
    }
}

/// 共通エラーはメッセージを変えずに包む
#[test]
fn test_common_error_is_transparent() {
    let err: AppError = Error::Rejected("UPC already exists".into()).into();
    assert_eq!(err.to_string(), "UPC already exists");

    let err: AppError = Error::Timeout.into();
    assert_eq!(err.to_string(), "Request timed out");
}

/// 入力エラーは警告、通信エラーは危険レベルの通知になる
#[test]
fn test_notice_levels_by_kind() {
    assert_eq!(Error::Validation("x".into()).kind(), ErrorKind::Input);
    assert_eq!(NoticeLevel::from(ErrorKind::Input), NoticeLevel::Warning);
    assert_eq!(NoticeLevel::from(ErrorKind::Transport), NoticeLevel::Danger);

    let mut board = NoticeBoard::new();
    board.error("Error looking up UPC", &Error::Transport("connection refused".into()));
    assert_eq!(
        board.notices()[0].message,
        "Error looking up UPC: Network error: connection refused"
    );
}

/// 存在しないCSVは送信前にエラー
#[tokio::test]
async fn test_import_missing_file() {
    let client = InventoryClient::new(Unreachable);
    let err = commands::import_file(&client, Path::new("/nonexistent/inventory.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileNotFound(_)));
}

/// CSV以外の拡張子は送信前にエラー
#[tokio::test]
async fn test_import_rejects_non_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("inventory.xlsx");
    std::fs::write(&path, b"not a csv").unwrap();

    let client = InventoryClient::new(Unreachable);
    let err = commands::import_file(&client, &path).await.unwrap_err();
    match err {
        AppError::Common(Error::Validation(message)) => assert_eq!(message, "File must be a CSV"),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// 空のUPCは送信しない
#[tokio::test]
async fn test_empty_lookup_sends_nothing() {
    let client = InventoryClient::new(Unreachable);
    let err = client.lookup_upc("   ").await.unwrap_err();
    assert_eq!(err.to_string(), "Please enter a UPC code");
}

/// URL未設定
#[test]
fn test_missing_base_url() {
    // 環境変数が設定されている環境ではスキップ
    if std::env::var(ammo_inventory::config::URL_ENV).is_ok() {
        return;
    }
    let config = Config::default();
    assert!(matches!(config.base_url(), Err(AppError::MissingBaseUrl)));
}
