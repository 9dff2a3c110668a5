#[tokio::main]
async fn main() {
    if let Err(err) = baklib_mcp::mcp::server::run_stdio().await {
        eprintln!("baklib-mcp: {}", err);
        std::process::exit(1);
    }
}
