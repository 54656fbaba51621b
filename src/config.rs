use crate::error::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub bind_host: String,
    pub bind_port: u16,
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_owned())
}

impl Config {
    /// Reads the process environment, with `.env` loaded first when present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Ok(Self {
            database_url: dotenv::var("DATABASE_URL")?,
            database_max_connections: var_or("DATABASE_MAX_CONNECTIONS", "5").parse()?,
            jwt_secret: dotenv::var("JWT_SECRET")?,
            bind_host: var_or("BIND_HOST", "0.0.0.0"),
            bind_port: var_or("BIND_PORT", "8000").parse()?,
        })
    }
}
