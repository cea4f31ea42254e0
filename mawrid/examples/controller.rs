//! Wires a controller whose dependency is only known through an interface.
//!
//! Run with `RUST_LOG=mawrid_container=trace` to watch the resolution.

use std::sync::Arc;

use mawrid::Injectable;
use mawrid::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

trait SomeInterface: Send + Sync {
    fn describe(&self) -> String;
}

#[derive(Injectable)]
struct Sub;

impl SomeInterface for Sub {
    fn describe(&self) -> String {
        "sub".to_string()
    }
}

#[derive(Injectable)]
struct Controller {
    sub: Arc<dyn SomeInterface>,
}

impl Controller {
    fn handle(&self) -> String {
        format!("handled by {}", self.sub.describe())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mawrid_container=debug")),
        )
        .init();

    let mut container = Container::new();

    // The interface cannot be built on its own; bind an implementation.
    let sub: Arc<Sub> = container.resolve()?;
    container.bind::<dyn SomeInterface>(sub);

    let controller: Arc<Controller> = container.resolve()?;
    info!(response = %controller.handle(), "Controller ready");
    println!("{container:?}");

    Ok(())
}
