//! # Transaction Module
//!
//! The envelope every Tessera transaction travels in, how it is encoded,
//! and how it is signed.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    Envelope, type-tagged messages, signatures, MalleatedTx
//! codec.rs    TxCodec trait and the tagged bincode format
//! builder.rs  Fluent TxBuilder and TxBuilderOption
//! signing.rs  TxSigner trait, KeyringSigner, signature verification
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: a signer creates a [`TxBuilder`] from [`TxBuilderOption`]s.
//! 2. **Sign**: [`TxSigner::build_signed_tx`] adds the message and signs the
//!    [`SignDoc`].
//! 3. **Encode**: [`TxCodec::encode_tx`] produces the bytes that enter the
//!    mempool.
//! 4. **Malleate**: the block builder rewrites blob transactions and wraps
//!    them as [`MalleatedTx`] with their share index.

pub mod builder;
pub mod codec;
pub mod signing;
pub mod types;

pub use builder::{TxBuilder, TxBuilderOption};
pub use codec::{unwrap_malleated_tx, wrap_malleated_tx, BincodeCodec, CodecError, TxCodec};
pub use signing::{verify_tx_signature, KeyringSigner, SignError, TxSigner};
pub use types::{
    AnyMsg, AuthInfo, MalleatedTx, ModeInfo, Msg, MsgSend, SignDoc, SignatureData, SignatureV2,
    SignerInfo, Tx, TxBody, URL_MSG_PAY_FOR_BLOB, URL_MSG_SEND, URL_MSG_WIRE_PAY_FOR_BLOB,
};
