pub mod run;

use secrecy::SecretString;
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum Action {
    SignUp {
        email: String,
        password: SecretString,
        display_name: Option<String>,
    },
    SignIn {
        email: String,
        password: SecretString,
    },
    Verify {
        token: String,
    },
    ProfileGet {
        uid: String,
    },
    ProfileSet {
        uid: String,
        fields: Map<String, Value>,
    },
}

impl Action {
    /// Execute the action against the gateway handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails.
    pub async fn execute(self, gateway: &crate::gateway::Gateway) -> anyhow::Result<()> {
        run::execute(self, gateway).await
    }
}
