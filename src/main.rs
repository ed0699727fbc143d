#[tokio::main]
async fn main() {
    landscaping_backend::run().await;
}
