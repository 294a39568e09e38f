//! One-time-password issuance and verification for admin login.
//!
//! Codes are persisted before delivery; if delivery then fails the
//! stored row simply expires unused. Verification consumes the code
//! with a conditional update so a concurrently replayed code wins at
//! most once.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;

use toolrack_core::config::otp::OtpConfig;
use toolrack_core::traits::messenger::Messenger;
use toolrack_core::{AppError, AppResult};
use toolrack_entity::otp::NewOtpCode;
use toolrack_entity::profile::Profile;
use toolrack_entity::store::{OtpStore, ProfileDirectory};

use crate::actor::ActorValidator;

/// Issues and verifies single-use admin login codes.
#[derive(Clone)]
pub struct OtpService {
    otps: Arc<dyn OtpStore>,
    messenger: Arc<dyn Messenger>,
    actors: ActorValidator,
    config: OtpConfig,
}

impl OtpService {
    /// Create a service over the given stores and messenger.
    pub fn new(
        otps: Arc<dyn OtpStore>,
        profiles: Arc<dyn ProfileDirectory>,
        messenger: Arc<dyn Messenger>,
        config: OtpConfig,
    ) -> Self {
        Self {
            otps,
            messenger,
            actors: ActorValidator::new(profiles),
            config,
        }
    }

    /// Issue a fresh code for an admin NIK and deliver it over Telegram.
    pub async fn request_code(&self, nik: &str) -> AppResult<()> {
        let profile = self.actors.admin(nik).await?;
        let chat_id = profile
            .telegram_chat_id
            .ok_or_else(|| AppError::forbidden("Akun admin belum terhubung ke Telegram."))?;

        let code = self.generate_code();
        let now = Utc::now();
        self.otps
            .insert_code(&NewOtpCode {
                nik: profile.nik.clone(),
                code: code.clone(),
                expires_at: now + Duration::seconds(self.config.ttl_seconds),
                created_at: now,
            })
            .await?;

        let minutes = self.config.ttl_seconds / 60;
        self.messenger
            .send_message(
                chat_id,
                &format!("Kode OTP ToolRack: {code}. Berlaku {minutes} menit."),
            )
            .await?;

        info!(nik = %profile.nik, chat_id, "OTP code issued");
        Ok(())
    }

    /// Verify and consume a code; returns the admin profile on success.
    pub async fn verify_code(&self, nik: &str, code: &str) -> AppResult<Profile> {
        let profile = self.actors.admin(nik).await?;

        let now = Utc::now();
        let row = self
            .otps
            .find_valid_code(&profile.nik, code.trim(), now)
            .await?
            .ok_or_else(|| AppError::forbidden("Kode OTP salah atau kedaluwarsa."))?;

        let consumed = self.otps.mark_used(row.id, now).await?;
        if consumed == 0 {
            return Err(AppError::forbidden("Kode OTP salah atau kedaluwarsa."));
        }

        info!(nik = %profile.nik, "OTP verified");
        Ok(profile)
    }

    fn generate_code(&self) -> String {
        let span = 10u64.pow(self.config.digits);
        let n = rand::rng().random_range(0..span);
        format!("{n:0width$}", width = self.config.digits as usize)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use toolrack_core::error::ErrorKind;
    use toolrack_database::MemoryBackend;
    use toolrack_entity::profile::Role;

    use super::*;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<(i64, String)>>,
        fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(AppError::external_service("Telegram unreachable"));
            }
            self.sent.lock().await.push((chat_id, text.to_string()));
            Ok(())
        }
    }

    async fn fixture() -> (Arc<MemoryBackend>, Arc<RecordingMessenger>, OtpService) {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .seed_profile("77777", Some(Role::Admin), true, Some(4242))
            .await;
        backend
            .seed_profile("12345", Some(Role::Tech), true, None)
            .await;
        let messenger = Arc::new(RecordingMessenger::default());
        let service = OtpService::new(
            backend.clone(),
            backend.clone(),
            messenger.clone(),
            OtpConfig::default(),
        );
        (backend, messenger, service)
    }

    fn extract_code(text: &str) -> String {
        text.chars().filter(|c| c.is_ascii_digit()).take(6).collect()
    }

    #[tokio::test]
    async fn test_request_then_verify_round_trip() {
        let (_backend, messenger, service) = fixture().await;

        service.request_code("77777").await.unwrap();
        let sent = messenger.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 4242);
        let code = extract_code(&sent[0].1);
        drop(sent);

        let profile = service.verify_code("77777", &code).await.unwrap();
        assert_eq!(profile.nik, "77777");

        // The code is single-use.
        let err = service.verify_code("77777", &code).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_request_code() {
        let (_backend, messenger, service) = fixture().await;

        let err = service.request_code("12345").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "NIK bukan admin.");
        assert!(messenger.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_admin_without_chat_is_rejected() {
        let (backend, _messenger, service) = fixture().await;
        backend
            .seed_profile("88888", Some(Role::Admin), true, None)
            .await;

        let err = service.request_code("88888").await.unwrap_err();
        assert_eq!(err.message, "Akun admin belum terhubung ke Telegram.");
    }

    #[tokio::test]
    async fn test_delivery_failure_surfaces_as_error() {
        let (_backend, messenger, service) = fixture().await;
        messenger
            .fail
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let err = service.request_code("77777").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }

    #[tokio::test]
    async fn test_wrong_code_is_rejected() {
        let (_backend, messenger, service) = fixture().await;
        service.request_code("77777").await.unwrap();

        let sent = messenger.sent.lock().await;
        let code = extract_code(&sent[0].1);
        drop(sent);
        let wrong = if code == "000000" { "000001" } else { "000000" };

        let err = service.verify_code("77777", wrong).await.unwrap_err();
        assert_eq!(err.message, "Kode OTP salah atau kedaluwarsa.");
    }
}
