// Domain layer: record model, cleaning rules and ports. No I/O in here.

pub mod cleaner;
pub mod model;
pub mod ports;
