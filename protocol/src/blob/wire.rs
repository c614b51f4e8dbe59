//! The two-phase wire message lifecycle and envelope inspection.
//!
//! ```text
//! new()                    commit: namespace width check, share commitment
//!   -> sign_share_commitment()   sign the future MsgPayForBlob
//!   -> validate_basic()          admission
//!   -> process_wire_pay_for_blob()  malleation: MsgPayForBlob + Blob + signature
//! ```
//!
//! The signature is produced over the canonical [`MsgPayForBlob`] envelope
//! that will exist after malleation, so the block builder never re-signs.

use tracing::debug;

use super::error::{ExtractError, MalleateError, ValidationError};
use super::types::{MsgPayForBlob, MsgWirePayForBlob, Signed, Unsigned};
use crate::address::validate_address;
use crate::block::Blob;
use crate::commitment::{create_commitment, verify_commitment};
use crate::config::ChainParams;
use crate::namespace::{NamespaceError, NamespaceId};
use crate::transaction::{
    AnyMsg, SignError, SignatureData, Tx, TxBuilderOption, TxSigner, URL_MSG_WIRE_PAY_FOR_BLOB,
};

// ---------------------------------------------------------------------------
// Commit & sign
// ---------------------------------------------------------------------------

impl MsgWirePayForBlob<Unsigned> {
    /// Commit phase. Checks only the namespace width; full legality is left
    /// to [`MsgWirePayForBlob::validate_basic`].
    pub fn new(params: &ChainParams, namespace: &[u8], blob: Vec<u8>) -> Result<Self, NamespaceError> {
        let namespace_id = NamespaceId::new(params, namespace)?;
        let share_commitment = create_commitment(params, &namespace_id, &blob);
        Ok(Self {
            namespace_id,
            blob_size: blob.len() as u64,
            blob,
            share_commitment,
            signing: Unsigned,
        })
    }

    /// Sign phase. Builds the canonical envelope this message becomes after
    /// malleation, has `signer` sign it, and keeps the single signature.
    pub fn sign_share_commitment<T: TxSigner + ?Sized>(
        self,
        params: &ChainParams,
        signer: &T,
        options: &[TxBuilderOption],
    ) -> Result<MsgWirePayForBlob<Signed>, SignError> {
        let address = signer
            .address()
            .filter(|addr| !addr.is_empty())
            .ok_or(SignError::NoAddress)?;
        let signer_address = address.to_bech32(&params.address_hrp)?;

        let canonical = pay_for_blob(params, &self, &signer_address);
        let builder = signer.new_tx_builder(options);
        let tx = signer.build_signed_tx(builder, AnyMsg::pack(&canonical)?)?;

        let mut sigs = tx.signatures_v2()?;
        if sigs.len() != 1 {
            return Err(SignError::UnexpectedSignerCount(sigs.len()));
        }
        let signature = match sigs.remove(0).data {
            SignatureData::Single { signature } => signature,
            SignatureData::Multi { .. } => return Err(SignError::NotSingleSigner),
        };

        Ok(MsgWirePayForBlob {
            namespace_id: self.namespace_id,
            blob_size: self.blob_size,
            blob: self.blob,
            share_commitment: self.share_commitment,
            signing: Signed {
                signer: signer_address,
                signature,
            },
        })
    }
}

/// Projects a wire message onto its canonical form, recomputing the
/// commitment from the carried blob.
fn pay_for_blob<S>(params: &ChainParams, wire: &MsgWirePayForBlob<S>, signer: &str) -> MsgPayForBlob {
    MsgPayForBlob {
        namespace_id: wire.namespace_id.clone(),
        blob_size: wire.blob_size,
        share_commitment: create_commitment(params, &wire.namespace_id, &wire.blob),
        signer: signer.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Signed messages
// ---------------------------------------------------------------------------

impl MsgWirePayForBlob<Signed> {
    /// The canonical message without its signature.
    pub fn unsigned_pay_for_blob(&self, params: &ChainParams) -> MsgPayForBlob {
        pay_for_blob(params, self, &self.signing.signer)
    }

    /// Stateless admission checks: namespace, signer address, declared size,
    /// then share commitment.
    pub fn validate_basic(&self, params: &ChainParams) -> Result<(), ValidationError> {
        self.namespace_id.validate(params)?;
        validate_address(params, &self.signing.signer)?;

        if self.blob_size != self.blob.len() as u64 {
            return Err(ValidationError::SizeMismatch {
                declared: self.blob_size,
                actual: self.blob.len(),
            });
        }

        if !verify_commitment(params, &self.namespace_id, &self.blob, &self.share_commitment) {
            return Err(ValidationError::BadCommitment);
        }
        Ok(())
    }
}

/// Splits a signed wire message into the canonical message, the blob to
/// place, and the signature to carry forward.
pub fn process_wire_pay_for_blob(
    params: &ChainParams,
    wire: &MsgWirePayForBlob<Signed>,
) -> Result<(MsgPayForBlob, Blob, Vec<u8>), MalleateError> {
    if wire.blob_size != wire.blob.len() as u64 {
        return Err(MalleateError::SizeMismatch {
            declared: wire.blob_size,
            actual: wire.blob.len(),
        });
    }
    if wire.signing.signature.is_empty() {
        return Err(MalleateError::MissingSignature);
    }

    let pfb = wire.unsigned_pay_for_blob(params);
    let blob = Blob::new(wire.namespace_id.clone(), wire.blob.clone());
    Ok((pfb, blob, wire.signing.signature.clone()))
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Quick scan of the message type URLs. Does not decode anything.
pub fn has_wire_payload(tx: &Tx) -> bool {
    tx.messages()
        .iter()
        .any(|msg| msg.type_url == URL_MSG_WIRE_PAY_FOR_BLOB)
}

/// Pulls the wire message out of a single-message envelope.
pub fn extract_wire_payload(tx: &Tx) -> Result<MsgWirePayForBlob, ExtractError> {
    if !has_wire_payload(tx) {
        return Err(ExtractError::NotFound);
    }

    let msgs = tx.messages();
    if msgs.len() != 1 {
        return Err(ExtractError::MultipleMessagesUnsupported { count: msgs.len() });
    }

    msgs[0].unpack::<MsgWirePayForBlob>().map_err(|err| {
        debug!(error = %err, "wire message failed to decode");
        ExtractError::NotFound
    })
}

/// Commits to `blob`, signs the future canonical transaction, and wraps the
/// signed wire message in an envelope signed by the same signer with the
/// same options. This is what a client submits to the mempool.
pub fn build_wire_tx<T: TxSigner + ?Sized>(
    params: &ChainParams,
    signer: &T,
    namespace: &[u8],
    blob: Vec<u8>,
    options: &[TxBuilderOption],
) -> Result<Tx, SignError> {
    let wire = MsgWirePayForBlob::new(params, namespace, blob)?
        .sign_share_commitment(params, signer, options)?;
    signer.build_signed_tx(signer.new_tx_builder(options), AnyMsg::pack(&wire)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, AddressError};
    use crate::crypto::keys::Keypair;
    use crate::transaction::{
        verify_tx_signature, KeyringSigner, ModeInfo, MsgSend, SignerInfo, TxBuilder,
    };

    const NS: [u8; 8] = [0x0A; 8];

    fn params() -> ChainParams {
        ChainParams::mainnet()
    }

    fn signer() -> KeyringSigner {
        KeyringSigner::new(Keypair::from_seed(&[0x11; 32]), "tessera-test-1", 0)
    }

    fn signed(blob: Vec<u8>) -> MsgWirePayForBlob<Signed> {
        MsgWirePayForBlob::new(&params(), &NS, blob)
            .unwrap()
            .sign_share_commitment(&params(), &signer(), &[])
            .unwrap()
    }

    struct NoAddressSigner;

    impl TxSigner for NoAddressSigner {
        fn address(&self) -> Option<Address> {
            None
        }

        fn chain_id(&self) -> &str {
            "tessera-test-1"
        }

        fn build_signed_tx(&self, builder: TxBuilder, msg: AnyMsg) -> Result<Tx, SignError> {
            Ok(builder.msg(msg).build())
        }
    }

    /// Produces two single signatures for every envelope.
    struct DoubleSigner(KeyringSigner);

    impl TxSigner for DoubleSigner {
        fn address(&self) -> Option<Address> {
            self.0.address()
        }

        fn chain_id(&self) -> &str {
            self.0.chain_id()
        }

        fn build_signed_tx(&self, builder: TxBuilder, msg: AnyMsg) -> Result<Tx, SignError> {
            let mut tx = self.0.build_signed_tx(builder, msg)?;
            tx.auth_info.signer_infos.push(tx.auth_info.signer_infos[0].clone());
            tx.signatures.push(tx.signatures[0].clone());
            Ok(tx)
        }
    }

    #[test]
    fn new_computes_size_and_commitment() {
        let p = params();
        let wire = MsgWirePayForBlob::new(&p, &NS, vec![7; 100]).unwrap();
        assert_eq!(wire.blob_size, 100);
        assert_eq!(
            wire.share_commitment,
            create_commitment(&p, &NamespaceId::new(&p, &NS).unwrap(), &[7; 100])
        );
    }

    #[test]
    fn new_checks_width_but_not_legality() {
        let p = params();
        assert!(matches!(
            MsgWirePayForBlob::new(&p, &[1; 4], vec![1]),
            Err(NamespaceError::WrongLength { got: 4, want: 8 })
        ));
        // Reserved, but only validate_basic rejects it.
        assert!(MsgWirePayForBlob::new(&p, &[0; 8], vec![1]).is_ok());
    }

    #[test]
    fn signing_sets_signer_and_signature() {
        let wire = signed(vec![1; 64]);
        let expected = signer()
            .address()
            .unwrap()
            .to_bech32("tess")
            .unwrap();
        assert_eq!(wire.signer(), expected);
        assert_eq!(wire.signature().len(), 64);
        wire.validate_basic(&params()).unwrap();
    }

    #[test]
    fn signature_covers_the_canonical_envelope() {
        let p = params();
        let s = signer();
        let options = [TxBuilderOption::GasLimit(50_000), TxBuilderOption::FeeAmount(10)];
        let wire = MsgWirePayForBlob::new(&p, &NS, vec![3; 900])
            .unwrap()
            .sign_share_commitment(&p, &s, &options)
            .unwrap();

        let canonical = s
            .new_tx_builder(&options)
            .msg(AnyMsg::pack(&wire.unsigned_pay_for_blob(&p)).unwrap())
            .signer_info(SignerInfo {
                public_key: s.keypair().public_key_bytes().to_vec(),
                mode_info: ModeInfo::Single,
                sequence: s.sequence(),
            })
            .signature(wire.signature().to_vec())
            .build();

        verify_tx_signature(&canonical, s.chain_id()).unwrap();
    }

    #[test]
    fn signing_without_address_fails() {
        let unsigned = MsgWirePayForBlob::new(&params(), &NS, vec![1]).unwrap();
        assert_eq!(
            unsigned
                .sign_share_commitment(&params(), &NoAddressSigner, &[])
                .unwrap_err(),
            SignError::NoAddress
        );
    }

    #[test]
    fn signing_requires_exactly_one_signature() {
        let unsigned = MsgWirePayForBlob::new(&params(), &NS, vec![1]).unwrap();
        assert_eq!(
            unsigned
                .sign_share_commitment(&params(), &DoubleSigner(signer()), &[])
                .unwrap_err(),
            SignError::UnexpectedSignerCount(2)
        );
    }

    #[test]
    fn validate_basic_reports_each_failure() {
        let p = params();

        let mut wire = signed(vec![5; 300]);
        wire.namespace_id = NamespaceId::new(&p, &[0xFF; 8]).unwrap();
        assert_eq!(
            wire.validate_basic(&p),
            Err(ValidationError::Namespace(NamespaceError::ParityNamespace))
        );

        let mut wire = signed(vec![5; 300]);
        wire.signing.signer = "cosmos1notours".to_string();
        assert!(matches!(
            wire.validate_basic(&p),
            Err(ValidationError::Address(AddressError::Bech32Decode(_)))
        ));

        let mut wire = signed(vec![5; 300]);
        wire.blob_size = 301;
        assert_eq!(
            wire.validate_basic(&p),
            Err(ValidationError::SizeMismatch { declared: 301, actual: 300 })
        );

        let mut wire = signed(vec![5; 300]);
        wire.blob[0] ^= 1;
        assert_eq!(wire.validate_basic(&p), Err(ValidationError::BadCommitment));
    }

    #[test]
    fn validate_basic_checks_namespace_first() {
        let p = params();
        let mut wire = signed(vec![5; 300]);
        wire.namespace_id = NamespaceId::new(&p, &[0; 8]).unwrap();
        wire.blob_size = 1;
        assert!(matches!(
            wire.validate_basic(&p),
            Err(ValidationError::Namespace(NamespaceError::Reserved { .. }))
        ));
    }

    #[test]
    fn process_returns_canonical_blob_and_signature() {
        let p = params();
        let wire = signed(vec![9; 700]);
        let (pfb, blob, sig) = process_wire_pay_for_blob(&p, &wire).unwrap();

        assert_eq!(pfb.blob_size, 700);
        assert_eq!(pfb.signer, wire.signer());
        assert_eq!(pfb.share_commitment, wire.share_commitment);
        assert_eq!(blob.namespace_id, wire.namespace_id);
        assert_eq!(blob.data, wire.blob);
        assert_eq!(sig, wire.signature());
    }

    #[test]
    fn process_rejects_forged_size_and_missing_signature() {
        let p = params();
        let mut wire = signed(vec![9; 10]);
        wire.blob_size = 11;
        assert_eq!(
            process_wire_pay_for_blob(&p, &wire),
            Err(MalleateError::SizeMismatch { declared: 11, actual: 10 })
        );

        let mut wire = signed(vec![9; 10]);
        wire.signing.signature.clear();
        assert_eq!(
            process_wire_pay_for_blob(&p, &wire),
            Err(MalleateError::MissingSignature)
        );
    }

    #[test]
    fn extraction_from_envelopes() {
        let p = params();
        let s = signer();
        let tx = build_wire_tx(&p, &s, &NS, vec![4; 20], &[]).unwrap();
        assert!(has_wire_payload(&tx));
        let wire = extract_wire_payload(&tx).unwrap();
        assert_eq!(wire.blob, vec![4; 20]);

        let send = AnyMsg::pack(&MsgSend {
            from_address: "a".to_string(),
            to_address: "b".to_string(),
            amount: 1,
        })
        .unwrap();

        let plain = TxBuilder::new().msg(send.clone()).build();
        assert!(!has_wire_payload(&plain));
        assert_eq!(extract_wire_payload(&plain), Err(ExtractError::NotFound));

        let mixed = TxBuilder::new().msg(send).msg(tx.messages()[0].clone()).build();
        assert!(has_wire_payload(&mixed));
        assert_eq!(
            extract_wire_payload(&mixed),
            Err(ExtractError::MultipleMessagesUnsupported { count: 2 })
        );
    }

    #[test]
    fn quick_scan_false_positive_is_not_found() {
        let bogus = AnyMsg {
            type_url: URL_MSG_WIRE_PAY_FOR_BLOB.to_string(),
            value: vec![0xde, 0xad],
        };
        let tx = TxBuilder::new().msg(bogus).build();
        assert!(has_wire_payload(&tx));
        assert_eq!(extract_wire_payload(&tx), Err(ExtractError::NotFound));
    }
}
