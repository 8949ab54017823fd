use serde::Deserialize;
use std::{fs, path::Path};
use tokio::{fs::File, io::AsyncReadExt};

mod sections;
pub use sections::{LogConfiguration, LoginConfiguration, ServerConfiguration};


#[derive(Deserialize, Clone, Debug)]
pub struct Configuration {
    pub server: ServerConfiguration,
    #[serde(default)]
    pub login: LoginConfiguration,
    #[serde(default)]
    pub log: LogConfiguration,
}

impl Configuration {
    pub fn assert_endpoint_is_valid(&self) -> Result<(), &'static str> {
        let endpoint = match &self.server.endpoint {
            Some(e) => e.trim(),
            None => return Err("server endpoint is missing"),
        };

        if endpoint.is_empty() {
            return Err("server endpoint cannot be empty");
        }

        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err("server endpoint must start with http:// or https://");
        }

        Ok(())
    }

    pub fn assert_credentials_are_present(&self) -> Result<(), &'static str> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        if !present(&self.server.user) || !present(&self.server.password) {
            return Err("server user and password are required for this command");
        }

        Ok(())
    }

    pub fn assert_log_dir_permissions(&self) -> Result<(), &'static str> {
        let log_dir = match &self.log.directory {
            Some(d) => d,
            None => return Ok(()),
        };

        let path = Path::new(log_dir);

        if !path.try_exists().unwrap_or(false) {
            return Err("log directory does not exist");
        }

        let permissions = match fs::metadata(path) {
            Ok(m) => m.permissions(),
            Err(_) => return Err("cannot read log directory metadata"),
        };

        if permissions.readonly() {
            return Err("log directory cannot be readonly");
        }

        Ok(())
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("configuration file is missing: {file_path}"),
        )));
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    Ok(toml::from_str::<Configuration>(&result)?)
}
