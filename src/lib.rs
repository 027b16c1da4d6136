//! `hopnet` is a small, deterministic IPv4 forwarding core: Ethernet/ARP
//! network interfaces with expiring neighbor state, and a router that moves
//! datagrams between them by longest prefix match.
//!
//! The crate never blocks and never reads a wall clock. The host owns the
//! event loop: it delivers inbound frames to each interface, calls the
//! router's `route`, advances time with `tick` and drains each interface's
//! outbound frame queue.

extern crate byteorder;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

pub mod core;

use std::result::Result as StdResult;

use core::layers::Error as LayersError;

#[derive(Debug)]
pub enum Error {
    /// Indicates an error where a frame or packet could not be parsed.
    Malformed,
    /// Indicates an error where the operation was not performed.
    NoOp,
    /// Indicates an error where a route has invalid parameters.
    Route,
}

impl From<LayersError> for Error {
    fn from(_: LayersError) -> Error {
        Error::Malformed
    }
}

pub type Result<T> = StdResult<T, Error>;
