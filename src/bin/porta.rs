use anyhow::Result;
use porta::cli::start;
use porta::gateway::{Endpoints, Gateway};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments and initialize logging
    let (action, globals) = start()?;

    // Composition root: the gateway handle is built exactly once and passed
    // explicitly to the action.
    let gateway = Gateway::new(globals, Endpoints::default())?;

    action.execute(&gateway).await
}
