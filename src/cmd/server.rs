use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wg_dash::config::Args;
use wg_dash::http;
use wg_dash::names::PeerNameTable;
use wg_dash::stats::{StatsCache, SystemClock, WgDump};

fn main() {
    let args = Args::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with_line_number(true)
            .with_file(true)
            .finish(),
    )
    .unwrap();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.workers)
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(run(args));
}

async fn run(args: Args) {
    tracing::info!(
        "Starting wg-dash on {} (ttl={}s, workers={})",
        args.bind,
        args.cache_ttl,
        args.workers
    );

    // built once before serving begins, immutable afterwards
    let names = PeerNameTable::load(&args.peer_config_path());

    let cache = Arc::new(StatsCache::new(
        names,
        Arc::new(WgDump::default()),
        Arc::new(SystemClock),
        Duration::from_secs(args.cache_ttl),
        args.key_display_len,
    ));

    if let Err(e) = http::server::start(&args.bind, &args.static_dir, cache).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
