//! Landmark wire codec
//!
//! Decodes JSON landmark datagrams into validated [`Frame`]s and encodes
//! frames back into the same schema.

pub mod decoder;
pub mod encoder;
pub mod frame;

pub use decoder::{decode, decode_with_report, DecodeReport, HandRejection};
pub use encoder::{encode, encode_pretty};
pub use frame::{Frame, Hand, Landmark, RejectReason};
