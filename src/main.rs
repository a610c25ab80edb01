//! 接力翻译 CLI 入口
//!
//! 读入一个文本文件，沿指定的语言链（或随机打乱链）翻译后输出。
//! `--trace` 会把每一跳的中间结果一并打印，失败的跳标记为 (failed)。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use translation_relay::{scramble_chain, HopChain, RelayConfig, RelayEngine};

#[derive(Parser)]
#[command(
    name = "relay",
    about = "把文本沿语言跳转链送入机器翻译后端，多出口竞速",
    version
)]
struct Cli {
    /// 待翻译的文本文件
    file: PathBuf,

    /// 逗号分隔的语言链，例如 auto,de,fr,en
    #[arg(conflicts_with = "scramble")]
    languages: Option<String>,

    /// 忽略语言链参数，按配置随机生成打乱链
    #[arg(long)]
    scramble: bool,

    /// 打印每一跳的中间结果
    #[arg(long)]
    trace: bool,

    /// 配置文件路径（默认按固定路径搜索）
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => RelayConfig::from_file(path).map_err(|e| e.to_string())?,
        None => RelayConfig::load().map_err(|e| e.to_string())?,
    };

    let text = std::fs::read_to_string(&cli.file)
        .map_err(|e| format!("无法读取 {}: {}", cli.file.display(), e))?;

    let chain = if cli.scramble {
        scramble_chain(&config.scramble).map_err(|e| e.to_string())?
    } else {
        let list = cli
            .languages
            .as_deref()
            .ok_or("需要语言链参数（或 --scramble）")?;
        HopChain::parse(list).map_err(|e| e.to_string())?
    };

    tracing::info!(chain = %chain.languages().join("->"), "开始翻译");

    let engine = RelayEngine::from_config(&config).map_err(|e| e.to_string())?;
    let outcome = engine
        .translate(text.trim(), &chain)
        .await
        .map_err(|e| e.to_string())?;

    if cli.trace {
        for hop in &outcome.trace {
            println!("{:>4} {}", hop.lang, hop.text.as_deref().unwrap_or("(failed)"));
        }
        println!();
    }
    println!("{}", outcome.final_text);

    Ok(())
}
