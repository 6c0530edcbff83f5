use std::env::var;

use dotenvy::dotenv;

pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub database_url: String,
    pub batch_service_key: String,
    /// When set, the manual sweep trigger calls this endpoint instead of
    /// running in process.
    pub batch_endpoint_url: Option<String>,
}

impl Config {
    pub fn try_parse() -> Result<Config, &'static str> {
        let _ = dotenv();

        Ok(Config {
            port: var("PORT")
                .map_err(|_| "An error occured while getting PORT env param")?
                .parse::<u16>()
                .map_err(|_| "An error occured while parsing PORT env param")?,
            scheme: var("SCHEME").map_err(|_| "An error occured while getting SCHEME env param")?,
            host: var("HOST").map_err(|_| "An error occured while getting HOST env param")?,
            database_url: var("DATABASE_URL")
                .map_err(|_| "An error occured while getting DATABASE_URL env param")?,
            batch_service_key: var("BATCH_SERVICE_KEY")
                .map_err(|_| "An error occured while getting BATCH_SERVICE_KEY env param")?,
            batch_endpoint_url: var("BATCH_ENDPOINT_URL").ok(),
        })
    }
}
