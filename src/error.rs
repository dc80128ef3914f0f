use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] ammo_inventory_common::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server URL is not set. Run `ammo-inv config --set-url http://host:5000` or set AMMO_INVENTORY_URL")]
    MissingBaseUrl,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(u64),

    #[error("Search result #{index} does not exist ({count} results)")]
    NoSuchResult { index: usize, count: usize },

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
