use crate::cli::actions::Action;
use crate::gateway::Gateway;
use anyhow::Result;
use serde_json::Value;

/// Handle the action
pub async fn execute(action: Action, gateway: &Gateway) -> Result<()> {
    match action {
        Action::SignUp {
            email,
            password,
            display_name,
        } => {
            let auth = gateway
                .sign_up(&email, &password, display_name.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&auth)?);
        }

        Action::SignIn { email, password } => {
            let auth = gateway.sign_in(&email, &password).await?;
            println!("{}", serde_json::to_string_pretty(&auth)?);
        }

        Action::Verify { token } => match gateway.verify(&token).await {
            Some(claims) => println!("{}", serde_json::to_string_pretty(&claims)?),
            // verification failure is not fatal, callers see "unauthenticated"
            None => println!("unauthenticated"),
        },

        Action::ProfileGet { uid } => match gateway.get_profile(&uid).await? {
            Some(fields) => println!("{}", serde_json::to_string_pretty(&Value::Object(fields))?),
            None => println!("null"),
        },

        Action::ProfileSet { uid, fields } => {
            gateway.save_profile(&uid, &fields).await?;
            let summary =
                serde_json::json!({"uid": uid, "updated": fields.keys().collect::<Vec<_>>()});
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
