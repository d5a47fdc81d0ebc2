//! WhatsApp notifications for payment receipts.

use crate::config::{WhatsAppConfig, WhatsAppMode};
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Delivers WhatsApp messages either to the log or to an HTTP gateway.
pub enum Notifier {
    Mock,
    Gateway {
        client: Client,
        url: String,
        api_key: String,
    },
}

#[derive(Serialize)]
struct GatewayMessage<'a> {
    target: &'a str,
    message: &'a str,
}

impl Notifier {
    pub fn from_config(config: &WhatsAppConfig) -> Result<Self> {
        match config.mode {
            WhatsAppMode::Mock => Ok(Self::Mock),
            WhatsAppMode::Gateway => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .build()?;
                Ok(Self::Gateway {
                    client,
                    url: config.gateway_url.clone(),
                    api_key: config.api_key.clone(),
                })
            }
        }
    }

    /// Send a message to a WhatsApp number.
    pub async fn send(&self, nomor: &str, pesan: &str) -> Result<()> {
        match self {
            Self::Mock => {
                info!("[MOCK WA] Pesan: {} | Kirim ke: {}", pesan, nomor);
                Ok(())
            }
            Self::Gateway { client, url, api_key } => {
                let response = client
                    .post(url)
                    .header("Authorization", api_key)
                    .json(&GatewayMessage {
                        target: nomor,
                        message: pesan,
                    })
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(AppError::Notification(format!(
                        "Gateway responded with {}",
                        response.status()
                    )));
                }
                info!("[WA] Message delivered to {}", nomor);
                Ok(())
            }
        }
    }

    /// Send, logging instead of failing. Used where delivery is best effort.
    pub async fn send_or_log(&self, nomor: &str, pesan: &str) {
        if let Err(e) = self.send(nomor, pesan).await {
            warn!("[WA] Failed to notify {}: {}", nomor, e);
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock)
    }
}

/// Receipt text sent when a bill becomes paid.
pub fn receipt_message(bulan: &str, tahun: i32, jumlah: i64, school_name: &str) -> String {
    format!(
        "Pembayaran SPP {bulan} {tahun} sebesar {} telah diterima. Terima kasih! - {school_name}",
        crate::export::format_rupiah(jumlah)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_message() {
        let msg = receipt_message("Januari", 2025, 550_000, "SMK MEKAR MURNI");
        assert_eq!(
            msg,
            "Pembayaran SPP Januari 2025 sebesar Rp 550.000 telah diterima. Terima kasih! - SMK MEKAR MURNI"
        );
    }

    #[test]
    fn test_mock_from_default_config() {
        let notifier = Notifier::from_config(&WhatsAppConfig::default()).unwrap();
        assert!(notifier.is_mock());
    }

    #[tokio::test]
    async fn test_mock_send_succeeds() {
        let notifier = Notifier::Mock;
        assert!(notifier.send("08123456789", "halo").await.is_ok());
    }
}
