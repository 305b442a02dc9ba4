use anyhow::Result;
use clap::Parser;
use std::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use pitchdeck_rs::cli::{Args, log_directive};
use pitchdeck_rs::generator::standard;
use pitchdeck_rs::launch;
use pitchdeck_rs::utils::text::slugify;

fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive(verbose)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 读取配置前先安装日志，配置解析中的警告才能输出
    let (filter, filter_handle) = reload::Layer::new(log_filter(args.verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let config = args.to_config()?;
    if config.verbose && !args.verbose {
        filter_handle.reload(log_filter(true))?;
    }

    let request = args.to_request()?;

    if args.standard {
        let deck = standard::create(&request)?;
        fs::create_dir_all(&config.output_path)?;
        let path = config
            .output_path
            .join(format!("{}-standard.md", slugify(&deck.company_name)));
        fs::write(&path, deck.to_markdown())?;
        info!("💾 标准演示文稿已保存: {}", path.display());
        return Ok(());
    }

    let deck = launch(&config, &request).await?;
    info!(
        "📊 {} 张幻灯片, 预计时长 {} 秒, 输出目录: {}",
        deck.metadata.total_slides,
        deck.metadata.total_read_time,
        config.output_path.display()
    );

    Ok(())
}
