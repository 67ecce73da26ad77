#![warn(rust_2018_idioms)]

pub mod error;
pub mod handler;
pub(crate) mod transport;

pub use handler::Handler;
pub use transport::{
    TaggedBytesMut, TransportContext, TransportMessage, TransportProtocol, Transmit,
};
