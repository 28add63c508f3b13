#[tokio::main]
async fn main() -> anyhow::Result<()> {
    seocrew_server::start().await
}
