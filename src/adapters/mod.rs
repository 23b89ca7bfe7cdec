// Adapters layer: concrete radio drivers behind the `WlanDriver` port.

pub mod nmcli;

pub use nmcli::NmcliDriver;
