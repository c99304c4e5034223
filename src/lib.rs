//! spikescan — volume-spike / analyst-upside signal backtester.
//!
//! Detects days where trading volume spikes against its trailing average
//! while the latest analyst price target implies sufficient upside, then
//! scores each signal over a fixed forward holding window.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
