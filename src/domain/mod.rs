//! Domain layer: the charge entity, card validation, and the ports the
//! application layer talks to.

pub mod card;
pub mod charge;
pub mod ports;
