//! # Blob Transactions
//!
//! Users pay for blob space with a [`MsgWirePayForBlob`]: the blob itself,
//! its namespace, a share commitment, and a signature over the transaction
//! the block builder will turn it into. During block building the wire
//! message is malleated into a [`MsgPayForBlob`] that carries no blob, and
//! the blob goes into the square.
//!
//! ```text
//! types.rs  MsgWirePayForBlob<Unsigned | Signed>, MsgPayForBlob
//! wire.rs   commit, sign, validate, extract, malleate
//! error.rs  ValidationError, ExtractError, MalleateError
//! ```

pub mod error;
pub mod types;
pub mod wire;

pub use error::{ExtractError, MalleateError, ValidationError};
pub use types::{MsgPayForBlob, MsgWirePayForBlob, Signed, Unsigned};
pub use wire::{
    build_wire_tx, extract_wire_payload, has_wire_payload, process_wire_pay_for_blob,
};
