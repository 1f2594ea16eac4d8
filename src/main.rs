#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = airloft_backend::run().await {
        eprintln!("airloft-backend failed: {}", e);
        std::process::exit(1);
    }
}
