use secrecy::SecretString;
use std::path::PathBuf;

/// Credentials config, read once at startup and immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_key: SecretString,
    pub service_account: PathBuf,
    pub project_id: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_key: SecretString, service_account: PathBuf, project_id: String) -> Self {
        Self {
            api_key,
            service_account,
            project_id,
        }
    }
}
