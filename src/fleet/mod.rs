mod client;
mod types;

#[cfg(test)]
mod tests;

pub use client::{FleetClient, OrdersSource};
pub use types::{
    CargoEntry, DockOperation, DockingRequest, DockingResponse, Endpoint, Mission, OrdersPayload,
    iso_timestamp,
};
