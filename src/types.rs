pub use crate::utils::database;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Clone)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Production => "live",
            Self::Development => "test",
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct PaymentContext {
    pub api_endpoint: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub currency: String,
}

#[derive(Clone)]
pub struct MailContext {
    pub host: String,
    pub sender: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct CleanupContext {
    pub days_threshold: u32,
    pub unverified_users_schedule: String,
    pub expired_codes_schedule: String,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub db_conn: database::DatabaseConnection,
    pub payment: PaymentContext,
    pub mail: MailContext,
    pub cleanup: CleanupContext,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct PaymentConfig {
    pub api_endpoint: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub currency: String,
}

#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub sender: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct CleanupConfig {
    pub days_threshold: u32,
    pub unverified_users_schedule: String,
    pub expired_codes_schedule: String,
}

#[derive(Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub payment: PaymentConfig,
    pub mail: MailConfig,
    pub cleanup: CleanupConfig,
}

impl Default for Config {
    fn default() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u32>()
            .expect("Invalid PORT number");
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let payment_api_endpoint = env::var("STRIPE_API_ENDPOINT")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_secret_key = env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY not set");
        let payment_webhook_secret =
            env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET not set");
        let payment_currency = env::var("STRIPE_CURRENCY").unwrap_or_else(|_| "USD".to_string());
        let mail_host = env::var("MAIL_HOST").expect("MAIL_HOST not set");
        let mail_sender = env::var("MAIL_SENDER").expect("MAIL_SENDER not set");
        let mail_user = env::var("MAIL_USER").expect("MAIL_USER not set");
        let mail_password = env::var("MAIL_PASSWORD").expect("MAIL_PASSWORD not set");
        let cleanup_days_threshold = env::var("CLEANUP_DAYS_THRESHOLD")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<u32>()
            .expect("Invalid CLEANUP_DAYS_THRESHOLD number");
        let cleanup_unverified_users_schedule = env::var("CLEANUP_USERS_SCHEDULE")
            .unwrap_or_else(|_| "0 0 3 * * *".to_string());
        let cleanup_expired_codes_schedule =
            env::var("CLEANUP_CODES_SCHEDULE").unwrap_or_else(|_| "0 0 * * * *".to_string());

        Self {
            database: DatabaseConfig { url: database_url },
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            payment: PaymentConfig {
                api_endpoint: payment_api_endpoint,
                secret_key: payment_secret_key,
                webhook_secret: payment_webhook_secret,
                currency: payment_currency,
            },
            mail: MailConfig {
                host: mail_host,
                sender: mail_sender,
                user: mail_user,
                password: mail_password,
            },
            cleanup: CleanupConfig {
                days_threshold: cleanup_days_threshold,
                unverified_users_schedule: cleanup_unverified_users_schedule,
                expired_codes_schedule: cleanup_expired_codes_schedule,
            },
        }
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Context;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Context {
        let db_conn = database::connect(self.database.url.as_str()).await;
        database::migrate(db_conn.clone()).await;

        Context {
            app: AppContext {
                host: self.app.host,
                environment: self.app.environment,
                port: self.app.port,
                url: self.app.url,
            },
            db_conn,
            payment: PaymentContext {
                api_endpoint: self.payment.api_endpoint,
                secret_key: self.payment.secret_key,
                webhook_secret: self.payment.webhook_secret,
                currency: self.payment.currency,
            },
            mail: MailContext {
                host: self.mail.host,
                sender: self.mail.sender,
                user: self.mail.user,
                password: self.mail.password,
            },
            cleanup: CleanupContext {
                days_threshold: self.cleanup.days_threshold,
                unverified_users_schedule: self.cleanup.unverified_users_schedule,
                expired_codes_schedule: self.cleanup.expired_codes_schedule,
            },
        }
    }
}

/// Tick payload delivered by the cron streams in `jobs::monitor`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Job(DateTime<Utc>);

impl apalis::prelude::Job for Job {
    const NAME: &'static str = "foodcourt::Job";
}

impl From<DateTime<Utc>> for Job {
    fn from(t: DateTime<Utc>) -> Self {
        Self(t)
    }
}

/// A cron schedule paired with the work to run on each tick.
#[derive(Clone)]
pub struct SchedulableJob {
    pub name: &'static str,
    pub schedule: apalis::cron::Schedule,
    pub run: Arc<
        dyn Fn() -> Pin<Box<dyn Future<Output = Result<(), apalis::prelude::Error>> + Send>>
            + Send
            + Sync,
    >,
}
