use crate::domain::models::booking::Booking;
use crate::domain::ports::BookingNotifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpNotifier {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpNotifier {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    async fn post(&self, event: &str, booking: &Booking) -> Result<(), AppError> {
        let payload = NotifyPayload { event, booking };

        let res = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct NotifyPayload<'a> {
    event: &'a str,
    booking: &'a Booking,
}

#[async_trait]
impl BookingNotifier for HttpNotifier {
    async fn booking_created(&self, booking: &Booking) -> Result<(), AppError> {
        self.post("booking.created", booking).await
    }

    async fn booking_status_changed(&self, booking: &Booking) -> Result<(), AppError> {
        self.post("booking.status_changed", booking).await
    }
}
