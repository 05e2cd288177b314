// Domain layer: records, outcomes and the ports (interfaces) the pipeline depends on.

pub mod model;
pub mod ports;
