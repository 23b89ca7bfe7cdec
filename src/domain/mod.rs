// Domain layer: radio models and the driver port. No platform code here.

pub mod model;
pub mod ports;
