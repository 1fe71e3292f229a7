//! HTTP clients for the UTM registry services consumed by the deconfliction
//! engine: trajectory store, flight-plan store, geofence store, conflict
//! checker and path search.

mod client;

pub use client::RegistryClient;
