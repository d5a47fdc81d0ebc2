//! Shared state handed to every handler.

use crate::auth::TokenKeys;
use crate::billing::BillingService;
use crate::config::AppConfig;
use crate::error::Result;
use crate::notify::Notifier;
use crate::report::school_offset;
use chrono::FixedOffset;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub keys: Arc<TokenKeys>,
    pub notifier: Arc<Notifier>,
    pub billing: Arc<BillingService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Result<Self> {
        let notifier = Arc::new(Notifier::from_config(&config.whatsapp)?);
        let keys = Arc::new(TokenKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_hours));
        let billing = Arc::new(BillingService::new(db.clone(), config.billing.clone(), notifier.clone()));
        Ok(Self {
            db,
            config: Arc::new(config),
            keys,
            notifier,
            billing,
        })
    }

    /// School time zone used for report buckets.
    pub fn offset(&self) -> FixedOffset {
        school_offset(self.config.billing.utc_offset_hours)
    }
}
