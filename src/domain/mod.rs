// Domain layer: wire constants, response models and the transport port.

pub mod enums;
pub mod model;
pub mod ports;
