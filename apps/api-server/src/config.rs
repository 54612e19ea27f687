//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use postly_core::services::PostSettings;
use postly_infra::{JwtConfig, RateLimitConfig};

use crate::background::SchedulerConfig;

/// Read `key`, falling back to `default` when unset or unparsable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Main database settings. `None` in [`AppConfig::database`] selects the
/// in-memory store.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub jwt: JwtConfig,
    pub posts: PostSettings,
    pub scheduler: SchedulerConfig,
    pub auth_rate_limit: RateLimitConfig,
    /// Emails granted the admin role when they register.
    pub admin_emails: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig::default(),
            posts: PostSettings::default(),
            scheduler: SchedulerConfig::default(),
            auth_rate_limit: RateLimitConfig::default(),
            admin_emails: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = PostSettings::default();

        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseSettings {
                url,
                max_connections: env_or("DB_MAX_CONNECTIONS", 100),
                min_connections: env_or("DB_MIN_CONNECTIONS", 10),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            database,
            jwt: JwtConfig::from_env(),
            posts: PostSettings {
                daily_limit: env_or("POST_DAILY_LIMIT", defaults.daily_limit),
                page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            },
            scheduler: SchedulerConfig::from_env(),
            auth_rate_limit: RateLimitConfig::from_env(),
            admin_emails: parse_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_emails_are_trimmed_and_case_insensitive() {
        let config = AppConfig {
            admin_emails: parse_list(" root@example.com, ,ops@example.com "),
            ..AppConfig::default()
        };

        assert_eq!(config.admin_emails.len(), 2);
        assert!(config.is_admin_email("ROOT@example.com"));
        assert!(!config.is_admin_email("writer@example.com"));
    }
}
