use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Build the action and the credentials config from parsed arguments.
///
/// # Errors
///
/// Returns an error if required arguments are missing or the profile fields
/// are not a JSON object.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .context("missing required argument: --api-key")?;
    let service_account = matches
        .get_one::<PathBuf>("service-account")
        .cloned()
        .context("missing required argument: --service-account")?;
    let project_id = matches
        .get_one::<String>("project-id")
        .cloned()
        .context("missing required argument: --project-id")?;

    let globals = GlobalArgs::new(SecretString::from(api_key), service_account, project_id);

    let action = match matches.subcommand() {
        Some(("signup", sub)) => Action::SignUp {
            email: sub
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: SecretString::from(
                sub.get_one::<String>("password")
                    .cloned()
                    .context("missing required argument: --password")?,
            ),
            display_name: sub.get_one::<String>("display-name").cloned(),
        },

        Some(("signin", sub)) => Action::SignIn {
            email: sub
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: SecretString::from(
                sub.get_one::<String>("password")
                    .cloned()
                    .context("missing required argument: --password")?,
            ),
        },

        Some(("verify", sub)) => Action::Verify {
            token: sub
                .get_one::<String>("token")
                .cloned()
                .context("missing required argument: token")?,
        },

        Some(("profile", sub)) => match sub.subcommand() {
            Some(("get", sub)) => Action::ProfileGet {
                uid: sub
                    .get_one::<String>("uid")
                    .cloned()
                    .context("missing required argument: uid")?,
            },
            Some(("set", sub)) => {
                let uid = sub
                    .get_one::<String>("uid")
                    .cloned()
                    .context("missing required argument: uid")?;
                let raw = sub
                    .get_one::<String>("fields")
                    .cloned()
                    .context("missing required argument: fields")?;
                let fields: Map<String, Value> = serde_json::from_str(&raw)
                    .context("Error parsing fields: expected a JSON object")?;

                Action::ProfileSet { uid, fields }
            }
            _ => return Err(anyhow!("missing profile subcommand")),
        },

        _ => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn matches_for(args: Vec<&str>) -> clap::ArgMatches {
        commands::new().get_matches_from(args)
    }

    #[test]
    fn test_signup_action() -> Result<()> {
        let matches = matches_for(vec![
            "porta",
            "--api-key",
            "web-api-key",
            "--project-id",
            "demo-project",
            "signup",
            "--email",
            "a@x.com",
            "--password",
            "secret123",
        ]);

        let (action, globals) = handler(&matches)?;
        assert_eq!(globals.api_key.expose_secret(), "web-api-key");
        assert_eq!(globals.project_id, "demo-project");

        match action {
            Action::SignUp {
                email,
                password,
                display_name,
            } => {
                assert_eq!(email, "a@x.com");
                assert_eq!(password.expose_secret(), "secret123");
                assert_eq!(display_name, None);
            }
            other => return Err(anyhow!("unexpected action: {other:?}")),
        }
        Ok(())
    }

    #[test]
    fn test_profile_set_parses_fields() -> Result<()> {
        let matches = matches_for(vec![
            "porta",
            "--api-key",
            "web-api-key",
            "--project-id",
            "demo-project",
            "profile",
            "set",
            "user-123",
            r#"{"theme": "light"}"#,
        ]);

        let (action, _) = handler(&matches)?;
        match action {
            Action::ProfileSet { uid, fields } => {
                assert_eq!(uid, "user-123");
                assert_eq!(fields.get("theme"), Some(&json!("light")));
            }
            other => return Err(anyhow!("unexpected action: {other:?}")),
        }
        Ok(())
    }

    #[test]
    fn test_profile_set_rejects_non_object_fields() {
        let matches = matches_for(vec![
            "porta",
            "--api-key",
            "web-api-key",
            "--project-id",
            "demo-project",
            "profile",
            "set",
            "user-123",
            r#"["not", "an", "object"]"#,
        ]);

        let err = handler(&matches).err().expect("expected error");
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_verify_action() -> Result<()> {
        let matches = matches_for(vec![
            "porta",
            "--api-key",
            "web-api-key",
            "--project-id",
            "demo-project",
            "verify",
            "some-token",
        ]);

        let (action, _) = handler(&matches)?;
        match action {
            Action::Verify { token } => assert_eq!(token, "some-token"),
            other => return Err(anyhow!("unexpected action: {other:?}")),
        }
        Ok(())
    }
}
