use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_notifications::LineConfig;

pub use core_config::Environment;

/// Settings for the deadline sweep triggers.
#[derive(Clone, Debug, Default)]
pub struct CronConfig {
    /// Bearer secret required on `/api/cron/check`; unset leaves the endpoint open
    pub secret: Option<String>,
    /// Cron expression for the in-process sweep; unset disables the scheduler
    pub schedule: Option<String>,
}

impl FromEnv for CronConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env_optional("CRON_SECRET"),
            schedule: env_optional("SWEEP_SCHEDULE"),
        })
    }
}

/// Application configuration, composed from the shared config pieces.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub cron: CronConfig,
    pub line: LineConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?;
        let cron = CronConfig::from_env()?;
        let line = LineConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            cron,
            line,
        })
    }
}
