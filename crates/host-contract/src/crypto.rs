//! `crypto.*`: hashing, ECDSA verification, and Merkle-proof verification
//! (spec §4.9). Every function here is a thin call-out to the embedding
//! node's `HostDriver` — spec §1 places ECDSA/hash/Merkle-proof
//! implementations out of scope for in-crate computation, confirmed by
//! `original_source/contract/crypto_module.c`, where every one of these
//! functions is itself a cgo wrapper calling back into the Go host.

use crate::error::{ContractError, Result};
use host_vm::HostDriver;

pub fn sha256(driver: &dyn HostDriver, data: &[u8]) -> [u8; 32] {
    driver.crypto_sha256(data)
}

/// Exposed from hardfork ≥ 4 onward (spec GLOSSARY HF4 note).
pub fn keccak256(driver: &dyn HostDriver, data: &[u8]) -> [u8; 32] {
    driver.crypto_keccak256(data)
}

/// Verifies a raw ECDSA signature over `message` against a public key,
/// delegating the actual verification to the node.
pub fn ecverify(driver: &dyn HostDriver, message: &[u8], signature: &[u8], pubkey: &[u8]) -> Result<bool> {
    driver.crypto_ecverify(message, signature, pubkey).map_err(ContractError::catchable)
}

/// Verifies a Merkle-Patricia style inclusion proof: each proof node is
/// RLP-encoded here (marshalling stays in this crate) and the chained
/// hashing/comparison is delegated to the node (spec §4.9
/// `crypto.verifyProof`).
pub fn verify_proof(driver: &dyn HostDriver, key: &[u8], value: &[u8], proof_list: &[Vec<u8>], root: &[u8]) -> Result<bool> {
    if proof_list.is_empty() || proof_list.len() > host_config::MAX_PROOF_LIST_ELEMENTS {
        return Err(ContractError::MalformedProof);
    }

    let leaf = rlp::encode_list::<Vec<u8>, Vec<u8>>(&[key.to_vec(), value.to_vec()]);
    driver.crypto_verify_proof(&leaf, value, root, proof_list).map_err(ContractError::catchable)
}
