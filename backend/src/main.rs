use std::sync::{Arc, Mutex};

use clap::{self, Parser};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_core::store::CatalogStore;

mod api;
mod error;
mod http;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// Client origin allowed by the CORS policy
    #[arg(short, long, default_value = "http://localhost:3000")]
    origin: String,

    /// Log filter (error, warn, info, debug, trace)
    #[arg(short, long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let filter = args
        .log_level
        .as_deref()
        .and_then(|l| EnvFilter::try_new(l).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(Mutex::new(CatalogStore::seeded()));
    let schema = api::build_schema(store);
    let cors = http::CorsPolicy::new(&args.origin)?;

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Listening on: http://{}", local_addr);
    info!("GraphQL endpoint: http://{}/graphql", local_addr);

    http::serve(listener, schema, cors).await
}
