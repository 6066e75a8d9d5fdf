// Handlers module

pub mod socket;

pub use socket::client_connected;
