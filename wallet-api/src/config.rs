use std::env;

/// Runtime configuration, read from the environment (and `.env` if present)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON lines; anything else is human-readable.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    /// Read on its own so logging can start before the rest of the config is validated.
    pub fn from_env() -> Self {
        Self::parse(env::var("LOG_FORMAT").ok().as_deref())
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `lookup` stands in for `env::var` so tests don't touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) if !url.is_empty() => url,
            _ => database_url_from_parts(&lookup)?,
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "1323".to_string())
            .parse::<u16>()?;

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let log_format = LogFormat::parse(lookup("LOG_FORMAT").as_deref());

        Ok(Self {
            database_url,
            port,
            max_connections,
            log_format,
        })
    }

    /// Connection string with the password masked, for logging.
    pub fn redacted_database_url(&self) -> String {
        match (self.database_url.find("://"), self.database_url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let credentials = &self.database_url[scheme_end + 3..at];
                match credentials.split_once(':') {
                    Some((user, _)) => format!(
                        "{}{}:***{}",
                        &self.database_url[..scheme_end + 3],
                        user,
                        &self.database_url[at..]
                    ),
                    None => self.database_url.clone(),
                }
            }
            _ => self.database_url.clone(),
        }
    }
}

fn database_url_from_parts(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let part = |key: &str| lookup(key).filter(|v| !v.is_empty());

    match (
        part("DB_HOST"),
        part("DB_PORT"),
        part("DB_USER"),
        part("DB_PASSWORD"),
        part("DB_NAME"),
    ) {
        (Some(host), Some(port), Some(user), Some(password), Some(name)) => Ok(format!(
            "postgres://{user}:{password}@{host}:{port}/{name}?sslmode=disable"
        )),
        _ => anyhow::bail!("environment variables not set correctly for database connection"),
    }
}
