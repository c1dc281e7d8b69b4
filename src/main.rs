#[tokio::main]
async fn main() {
    officina_booking_backend::run().await;
}
