use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ammo-inv")]
#[command(about = "弾薬在庫管理クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// UPCを問い合わせて登録内容の下書きを表示
    Lookup {
        /// UPCコード
        code: String,
    },

    /// 在庫一覧
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// 在庫を追加
    Add {
        /// UPCを問い合わせて下書きを作る
        #[arg(long)]
        from_upc: Option<String>,

        #[command(flatten)]
        fields: ItemArgs,
    },

    /// 在庫を更新（指定した項目のみ上書き）
    Update {
        id: u64,

        #[command(flatten)]
        fields: ItemArgs,
    },

    /// 在庫を削除
    Delete {
        id: u64,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// UPCデータベースの操作
    Upc {
        #[command(subcommand)]
        command: UpcCommands,
    },

    /// 口径ごとのしきい値を表示・保存
    Thresholds {
        /// 口径（例: "9mm Luger"）
        caliber: String,

        /// critical low target の順に指定して保存
        #[arg(long, num_args = 3, value_names = ["CRITICAL", "LOW", "TARGET"])]
        set: Option<Vec<u64>>,
    },

    /// 在庫をCSVで出力
    Export {
        /// 出力ファイル（デフォルト: ammo_inventory_YYYYMMDD.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 取り込み用CSVテンプレートを出力
    Template {
        #[arg(short, long, default_value = "ammo_inventory_template.csv")]
        output: PathBuf,
    },

    /// CSVから在庫を取り込み
    Import {
        file: PathBuf,
    },

    /// オンラインショップを検索
    Search {
        query: String,

        /// 取得件数（デフォルト: 設定値）
        #[arg(short, long)]
        max: Option<u32>,

        /// N番目の結果をUPCデータベースに登録
        #[arg(long, value_name = "N")]
        import: Option<usize>,
    },

    /// 口径ごとの在庫グラフ
    Chart,

    /// 設定を表示・変更
    Config {
        /// サーバーURLを設定
        #[arg(long)]
        set_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum UpcCommands {
    /// UPC一覧
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// UPCを登録
    Add {
        upc: String,

        #[command(flatten)]
        fields: UpcArgs,
    },

    /// UPCを更新（指定した項目のみ上書き）
    Update {
        id: u64,

        #[arg(long)]
        upc: Option<String>,

        #[command(flatten)]
        fields: UpcArgs,
    },

    /// UPCを削除
    Delete {
        id: u64,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// 表示列の部分一致
    #[arg(short, long)]
    pub search: Option<String>,

    /// 口径の完全一致
    #[arg(short, long)]
    pub caliber: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ItemArgs {
    #[arg(long)]
    pub upc: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub caliber: Option<String>,

    /// 1箱あたりの弾数
    #[arg(long)]
    pub count_per_box: Option<String>,

    /// 箱数
    #[arg(long)]
    pub quantity: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct UpcArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub caliber: Option<String>,

    #[arg(long)]
    pub count_per_box: Option<String>,
}
