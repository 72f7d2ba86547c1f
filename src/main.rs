//! 应用程序入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、遥测层初始化、依赖注入，并充当元数据源的
//! 参考宿主：构造查询、投递中止信号、从结果队列取回记录。

mod core;
mod interfaces;
mod network;
mod sites;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::model::{BookRecord, CoverPayload};
use crate::core::sink::create_result_channel;
use crate::interfaces::{Identifiers, IdentifyQuery, MetadataSource};
use crate::network::context::ServiceContext;
use crate::network::service::HttpService;
use crate::network::session::Session;
use crate::sites::SourceRegistry;

/// 命令行界面脚手架 (CLI Scaffolding)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 目标源标识符
    #[arg(short, long, default_value = "qidian", global = true)]
    site: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 检索书籍元数据，结果以 JSON 输出
    Identify {
        /// 站点内书籍 ID
        #[arg(long)]
        id: Option<String>,
        /// 书名（无 ID 时走搜索回退）
        #[arg(long)]
        title: Option<String>,
        /// 作者，可重复传入
        #[arg(long)]
        author: Vec<String>,
    },
    /// 下载封面图到本地目录
    Cover {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Vec<String>,
        /// 只下载最新封面
        #[arg(long)]
        best_only: bool,
        /// 输出目录
        #[arg(long, default_value = "covers")]
        out: PathBuf,
    },
    /// 站点 ID 与详情页 URL 互转
    Url {
        /// 由 ID 推导详情页 URL
        #[arg(long)]
        id: Option<String>,
        /// 从 URL 反解站点 ID
        #[arg(long)]
        from: Option<String>,
    },
    /// 用固定样例自检 identify 流程（需要网络）
    Selftest,
}

/// 自检样例：标识符或标题 → 期望的书名与作者
struct SelfTestCase {
    id: Option<&'static str>,
    title: Option<&'static str>,
    expect_title: &'static str,
    expect_author: &'static str,
}

const SELF_TEST_CASES: [SelfTestCase; 2] = [
    SelfTestCase {
        id: Some("1025325277"),
        title: None,
        expect_title: "我们生活在南京",
        expect_author: "天瑞说符",
    },
    SelfTestCase {
        id: None,
        title: Some("一世之尊"),
        expect_title: "一世之尊",
        expect_author: "爱潜水的乌贼",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 遥测层初始化 (Telemetry Layer Initialization)
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_ansi(true)
        .init();

    // 依赖项初始化与注入 (Dependency Injection)
    let config = Arc::new(AppConfig::load()?);
    let cli = Cli::parse();

    let session = Arc::new(Session::mobile());
    let http = Arc::new(HttpService::new(session.clone())?);
    let ctx = ServiceContext::new(http, session, config);
    let registry = SourceRegistry::new();

    let Some(source) = registry.create(&cli.site, ctx.clone()) else {
        error!(
            "未知的源标识: {} (可用: {})",
            cli.site,
            registry.list().join(", ")
        );
        anyhow::bail!("unknown source: {}", cli.site);
    };

    // 信号处理与优雅退出 (Signal Handling)
    let abort = CancellationToken::new();
    let abort_clone = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            abort_clone.cancel();
        }
    });

    match cli.command {
        Commands::Identify { id, title, author } => {
            let query = build_query(source.as_ref(), id, title, author, &ctx);
            let records = run_identify(source.as_ref(), &abort, &query).await;

            if records.is_empty() {
                info!("未找到匹配记录");
            }
            for record in records {
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }

        Commands::Cover {
            id,
            title,
            author,
            best_only,
            out,
        } => {
            let query = build_query(source.as_ref(), id, title, author, &ctx);
            let (sink, drain) = create_result_channel::<CoverPayload>();
            source.download_cover(&sink, &abort, &query, best_only).await;

            let payloads = drain.collect();
            if payloads.is_empty() {
                info!("没有可用封面");
            }
            for (index, payload) in payloads.iter().enumerate() {
                let path = out.join(format!("{}_cover_{}.jpg", payload.provider, index));
                utils::save_file(&path, &payload.data).await?;
                info!("封面已保存: {} <- {}", path.display(), payload.url);
            }
        }

        Commands::Url { id, from } => {
            if let Some(url) = from {
                match source.id_from_url(&url) {
                    Some(id) => println!("{}", id),
                    None => anyhow::bail!("URL 中未识别出站点 ID: {}", url),
                }
            } else if let Some(id) = id {
                let mut identifiers = Identifiers::new();
                identifiers.insert(source.id().to_string(), id);
                match source.book_url(&identifiers) {
                    Some(book_url) => {
                        println!("{} {} {}", book_url.provider, book_url.id, book_url.url)
                    }
                    None => anyhow::bail!("无法推导详情页 URL"),
                }
            } else {
                anyhow::bail!("需要 --id 或 --from 之一");
            }
        }

        Commands::Selftest => {
            let mut failures = 0usize;
            for case in &SELF_TEST_CASES {
                let query = build_query(
                    source.as_ref(),
                    case.id.map(str::to_string),
                    case.title.map(str::to_string),
                    Vec::new(),
                    &ctx,
                );
                let records = run_identify(source.as_ref(), &abort, &query).await;

                let hit = records.iter().any(|r| {
                    r.title == case.expect_title
                        && r.authors.iter().any(|a| a == case.expect_author)
                });

                if hit {
                    info!(
                        "PASS: {} / {}",
                        case.expect_title, case.expect_author
                    );
                } else {
                    error!(
                        "FAIL: 期望 {} / {}，实际返回 {} 条记录",
                        case.expect_title,
                        case.expect_author,
                        records.len()
                    );
                    failures += 1;
                }
            }

            if failures > 0 {
                anyhow::bail!("自检失败 {} 项", failures);
            }
            info!("自检全部通过");
        }
    }

    Ok(())
}

/// 组装查询参数
fn build_query(
    source: &dyn MetadataSource,
    id: Option<String>,
    title: Option<String>,
    authors: Vec<String>,
    ctx: &ServiceContext,
) -> IdentifyQuery {
    let mut identifiers = Identifiers::new();
    if let Some(id) = id {
        identifiers.insert(source.id().to_string(), id);
    }

    IdentifyQuery {
        title,
        authors,
        identifiers,
        timeout: ctx.default_timeout(),
    }
}

/// 执行 identify 并取回全部结果
async fn run_identify(
    source: &dyn MetadataSource,
    abort: &CancellationToken,
    query: &IdentifyQuery,
) -> Vec<BookRecord> {
    let (sink, drain) = create_result_channel::<BookRecord>();
    source.identify(&sink, abort, query).await;
    drain.collect()
}
