use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Can't read {0} from env")]
    Missing(&'static str),
    #[error("Can't parse {name} from env: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub db_url: String,
    pub sentry_url: Option<String>,
    pub webhook_url: Option<String>,
    pub port: u16,
    pub review_group_id: Option<i64>,
    pub accepted_group_id: Option<i64>,
    pub lock_hashtag: String,
    pub unlock_hashtag: String,
    pub triggers_admin_only: bool,
}

fn read_from_env(name: &'static str) -> Result<String, ConfigError> {
    read_optional(name).ok_or(ConfigError::Missing(name))
}

fn read_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match read_optional(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

impl Config {
    pub fn init() -> Result<Self, ConfigError> {
        let bot_token = read_from_env("TELOXIDE_TOKEN")?;
        let db_url = read_from_env("DB_URL")?;
        let sentry_url = read_optional("SENTRY_URL");
        let webhook_url = read_optional("WEBHOOK_URL");
        let port = parse_optional("PORT")?.unwrap_or(8000);
        let review_group_id = parse_optional("REVIEW_GROUP_ID")?;
        let accepted_group_id = parse_optional("ACCEPTED_GROUP_ID")?;
        let lock_hashtag = read_optional("LOCK_HASHTAG").unwrap_or_else(|| "#enter".to_string());
        let unlock_hashtag = read_optional("UNLOCK_HASHTAG").unwrap_or_else(|| "#exit".to_string());
        let triggers_admin_only = parse_optional("TRIGGERS_ADMIN_ONLY")?.unwrap_or(true);

        Ok(Config {
            bot_token,
            db_url,
            sentry_url,
            webhook_url,
            port,
            review_group_id,
            accepted_group_id,
            lock_hashtag,
            unlock_hashtag,
            triggers_admin_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        env::set_var("ECLIS_TEST_BLANK", "   ");
        assert!(matches!(
            read_from_env("ECLIS_TEST_BLANK"),
            Err(ConfigError::Missing("ECLIS_TEST_BLANK"))
        ));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        env::set_var("ECLIS_TEST_PORT", "eighty");
        assert!(matches!(
            parse_optional::<u16>("ECLIS_TEST_PORT"),
            Err(ConfigError::Invalid { .. })
        ));

        env::set_var("ECLIS_TEST_GROUP", " -1002511380813 ");
        assert_eq!(
            parse_optional::<i64>("ECLIS_TEST_GROUP").unwrap(),
            Some(-1002511380813)
        );
    }
}
