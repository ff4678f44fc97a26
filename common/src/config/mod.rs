use serde::de::DeserializeOwned;

pub mod aws_client_config;

/// Environment files read by [`ConfigLoader::load_default`], most specific first.
const DEFAULT_ENV_FILES: [&str; 4] = [".env.production.local", ".env.production", ".env.local", ".env"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the default configuration for the project. This is the
    /// configuration used when running any of the commands.
    ///
    /// This will load the following files, in order:
    /// - OS environment variables
    /// - `.env.production.local` then `.env.production`
    /// - `.env.local`
    /// - `.env`
    ///
    /// If a variable is set in the OS environment, it will not be
    /// overriden by any file.
    pub fn load_default<TConfig>() -> Result<TConfig, envy::Error>
    where
        TConfig: DeserializeOwned,
    {
        ConfigLoader::load::<TConfig>(&DEFAULT_ENV_FILES)
    }

    fn load<TConfig>(files: &[&str]) -> Result<TConfig, envy::Error>
    where
        TConfig: DeserializeOwned,
    {
        for file in files {
            dotenv::from_filename(file).ok();
        }

        envy::from_env::<TConfig>()
    }
}
