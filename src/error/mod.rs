mod app;
mod dispatch;
mod fleet;

pub use app::{AppError, AppResult};
pub use dispatch::DispatchError;
pub use fleet::FleetError;
