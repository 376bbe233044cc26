//! Entry point for the TruView CMS server.

use truview_backend::{errors::StartupError, start_server};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    start_server().await
}
