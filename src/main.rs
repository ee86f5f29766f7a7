mod args;
mod config;
mod dispatch;
mod entry;
mod error;
mod fleet;
mod logger;
mod server;
mod shutdown;
mod shutdown_handlers;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
