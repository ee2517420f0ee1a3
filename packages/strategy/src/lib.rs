pub mod access;
pub mod converter;
pub mod errors;
pub mod events;
pub mod fee;
pub mod state;
pub mod strategy_core;
pub mod strategy_interface;

#[cfg(test)]
pub(crate) mod mock;
