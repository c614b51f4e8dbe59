//! Envelope construction via the builder pattern.
//!
//! [`TxBuilder`] collects messages, fee settings and signer infos and
//! produces a [`Tx`]. It does not sign; a [`super::signing::TxSigner`] drives
//! the builder and attaches the signature afterwards, so construction stays
//! testable without key material.

use serde::{Deserialize, Serialize};

use super::codec::CodecError;
use super::types::{
    AnyMsg, AuthInfo, ModeInfo, SignatureData, SignatureV2, SignerInfo, Tx, TxBody,
};

/// A setting applied to a fresh builder, in order, before it is handed to a
/// signer. Later options override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxBuilderOption {
    GasLimit(u64),
    FeeAmount(u64),
    Memo(String),
}

// ---------------------------------------------------------------------------
// TxBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Tx`] envelopes.
///
/// # Usage
///
/// ```rust
/// use tessera_protocol::transaction::{AnyMsg, MsgSend, TxBuilder, TxBuilderOption};
///
/// let send = MsgSend {
///     from_address: "tess1from".into(),
///     to_address: "tess1to".into(),
///     amount: 5,
/// };
/// let tx = TxBuilder::new()
///     .apply(&[TxBuilderOption::GasLimit(200_000), TxBuilderOption::FeeAmount(2_000)])
///     .msg(AnyMsg::pack(&send).unwrap())
///     .build();
///
/// assert_eq!(tx.gas_limit(), 200_000);
/// assert!(tx.signatures.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    messages: Vec<AnyMsg>,
    memo: String,
    gas_limit: u64,
    fee: u64,
    signer_infos: Vec<SignerInfo>,
    signatures: Vec<Vec<u8>>,
}

impl TxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies builder options in order.
    pub fn apply(mut self, options: &[TxBuilderOption]) -> Self {
        for option in options {
            self = match option {
                TxBuilderOption::GasLimit(gas) => self.gas_limit(*gas),
                TxBuilderOption::FeeAmount(fee) => self.fee(*fee),
                TxBuilderOption::Memo(memo) => self.memo(memo),
            };
        }
        self
    }

    /// Appends a message.
    pub fn msg(mut self, msg: AnyMsg) -> Self {
        self.messages.push(msg);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_string();
        self
    }

    /// Appends a signer info. Signatures are matched to signer infos by
    /// position.
    pub fn signer_info(mut self, info: SignerInfo) -> Self {
        self.signer_infos.push(info);
        self
    }

    /// Appends raw signature bytes for the signer at the same position.
    pub fn signature(mut self, signature: Vec<u8>) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Appends a complete signature: signer info and signature bytes.
    pub fn signature_v2(self, sig: SignatureV2) -> Result<Self, CodecError> {
        let (mode_info, raw) = match sig.data {
            SignatureData::Single { signature } => (ModeInfo::Single, signature),
            SignatureData::Multi { signatures } => {
                let threshold = signatures.len() as u32;
                let raw = bincode::serialize(&signatures)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
                (ModeInfo::Multi { threshold }, raw)
            }
        };

        Ok(self
            .signer_info(SignerInfo {
                public_key: sig.public_key,
                mode_info,
                sequence: sig.sequence,
            })
            .signature(raw))
    }

    /// Consumes the builder and produces the envelope.
    pub fn build(self) -> Tx {
        Tx {
            body: TxBody {
                messages: self.messages,
                memo: self.memo,
            },
            auth_info: AuthInfo {
                signer_infos: self.signer_infos,
                fee: self.fee,
                gas_limit: self.gas_limit,
            },
            signatures: self.signatures,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::MsgSend;

    fn send(amount: u64) -> AnyMsg {
        AnyMsg::pack(&MsgSend {
            from_address: "tess1a".to_string(),
            to_address: "tess1b".to_string(),
            amount,
        })
        .unwrap()
    }

    #[test]
    fn options_apply_in_order() {
        let tx = TxBuilder::new()
            .apply(&[
                TxBuilderOption::GasLimit(1),
                TxBuilderOption::FeeAmount(10),
                TxBuilderOption::Memo("first".to_string()),
                TxBuilderOption::GasLimit(2),
            ])
            .build();

        assert_eq!(tx.gas_limit(), 2);
        assert_eq!(tx.fee(), 10);
        assert_eq!(tx.memo(), "first");
    }

    #[test]
    fn messages_keep_insertion_order() {
        let tx = TxBuilder::new().msg(send(1)).msg(send(2)).build();
        assert_eq!(tx.messages().len(), 2);
        assert_eq!(tx.messages()[0].unpack::<MsgSend>().unwrap().amount, 1);
        assert_eq!(tx.messages()[1].unpack::<MsgSend>().unwrap().amount, 2);
    }

    #[test]
    fn unsigned_build_has_no_signatures() {
        let tx = TxBuilder::new().msg(send(1)).build();
        assert!(tx.signatures.is_empty());
        assert!(tx.auth_info.signer_infos.is_empty());
        assert!(tx.signatures_v2().unwrap().is_empty());
    }

    #[test]
    fn signature_v2_roundtrips_through_envelope() {
        let single = SignatureV2 {
            public_key: vec![1; 32],
            data: SignatureData::Single { signature: vec![2; 64] },
            sequence: 9,
        };
        let multi = SignatureV2 {
            public_key: vec![3; 32],
            data: SignatureData::Multi {
                signatures: vec![vec![4; 64], vec![5; 64]],
            },
            sequence: 1,
        };

        let tx = TxBuilder::new()
            .msg(send(1))
            .signature_v2(single.clone())
            .unwrap()
            .signature_v2(multi.clone())
            .unwrap()
            .build();

        assert_eq!(tx.signatures_v2().unwrap(), vec![single, multi]);
        assert_eq!(
            tx.auth_info.signer_infos[1].mode_info,
            ModeInfo::Multi { threshold: 2 }
        );
    }
}
