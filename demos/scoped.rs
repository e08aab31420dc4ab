#![allow(clippy::print_stdout, reason = "Fine for examples")]

//! Opening and closing the session around a block of work with [`Client::scope`].
//!
//! ```sh
//! cargo run --example scoped -- navi-vs-faze-01-05-2024
//! ```

use cs2api::Client;
use cs2api::error::{Kind, Status};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let slug = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "natus-vincere-vs-faze-11-05-2025".to_owned());

    let client = Client::default();

    let result = client
        .scope(|client| async move { client.match_details(&slug).await })
        .await;

    match result {
        Ok(details) => println!("{details:#}"),
        Err(e) if e.kind() == Kind::Status => {
            if let Some(status) = e.downcast_ref::<Status>() {
                println!("upstream said {}: {}", status.status_code, status.message);
            }
        }
        Err(e) => return Err(e.into()),
    }

    println!("session open after scope: {}", client.is_open());

    Ok(())
}
