//! Function signatures and calldata builders for the registrar contracts.

use bytes::Bytes;

use crate::{
    abi::{encode_call, Token},
    types::{Address, InterfaceId, TxRequest, B256},
};

/// Canonical function signatures.
pub mod sig {
    pub const RESOLVER: &str = "resolver(bytes32)";
    pub const OWNER_NODE: &str = "owner(bytes32)";
    pub const INTERFACE_IMPLEMENTER: &str = "interfaceImplementer(bytes32,bytes4)";
    pub const ADDR: &str = "addr(bytes32)";

    pub const ENTRIES: &str = "entries(bytes32)";
    pub const RELEASE_DEED: &str = "releaseDeed(bytes32)";
    pub const DEED_OWNER: &str = "owner()";

    pub const AVAILABLE_ID: &str = "available(uint256)";
    pub const NAME_EXPIRES: &str = "nameExpires(uint256)";
    pub const OWNER_OF: &str = "ownerOf(uint256)";
    pub const GRACE_PERIOD: &str = "GRACE_PERIOD()";
    pub const SAFE_TRANSFER_FROM: &str = "safeTransferFrom(address,address,uint256)";
    pub const RECLAIM: &str = "reclaim(uint256,address)";

    pub const AVAILABLE_LABEL: &str = "available(string)";
    pub const RENT_PRICE: &str = "rentPrice(string,uint256)";
    pub const MIN_COMMITMENT_AGE: &str = "minCommitmentAge()";
    pub const MAX_COMMITMENT_AGE: &str = "maxCommitmentAge()";
    pub const COMMITMENTS: &str = "commitments(bytes32)";
    pub const MAKE_COMMITMENT: &str = "makeCommitment(string,address,bytes32)";
    pub const MAKE_COMMITMENT_WITH_CONFIG: &str =
        "makeCommitmentWithConfig(string,address,bytes32,address,address)";
    pub const COMMIT: &str = "commit(bytes32)";
    pub const REGISTER: &str = "register(string,address,uint256,bytes32)";
    pub const REGISTER_WITH_CONFIG: &str =
        "registerWithConfig(string,address,uint256,bytes32,address,address)";
    pub const RENEW: &str = "renew(string,uint256)";

    pub const DNS_CLAIM: &str = "claim(bytes,bytes)";
    pub const DNS_PROVE_AND_CLAIM: &str = "proveAndClaim(bytes,bytes,bytes)";
}

// Reads

#[must_use]
pub fn resolver(node: B256) -> Bytes {
    encode_call(sig::RESOLVER, &[Token::Word(node)])
}

#[must_use]
pub fn owner_of_node(node: B256) -> Bytes {
    encode_call(sig::OWNER_NODE, &[Token::Word(node)])
}

#[must_use]
pub fn interface_implementer(node: B256, interface_id: InterfaceId) -> Bytes {
    encode_call(sig::INTERFACE_IMPLEMENTER, &[Token::Word(node), Token::Interface(interface_id)])
}

#[must_use]
pub fn addr(node: B256) -> Bytes {
    encode_call(sig::ADDR, &[Token::Word(node)])
}

#[must_use]
pub fn entries(label_hash: B256) -> Bytes {
    encode_call(sig::ENTRIES, &[Token::Word(label_hash)])
}

#[must_use]
pub fn deed_owner() -> Bytes {
    encode_call(sig::DEED_OWNER, &[])
}

#[must_use]
pub fn available_by_id(label_hash: B256) -> Bytes {
    encode_call(sig::AVAILABLE_ID, &[Token::Word(label_hash)])
}

#[must_use]
pub fn name_expires(label_hash: B256) -> Bytes {
    encode_call(sig::NAME_EXPIRES, &[Token::Word(label_hash)])
}

#[must_use]
pub fn owner_of(label_hash: B256) -> Bytes {
    encode_call(sig::OWNER_OF, &[Token::Word(label_hash)])
}

#[must_use]
pub fn grace_period() -> Bytes {
    encode_call(sig::GRACE_PERIOD, &[])
}

#[must_use]
pub fn available_by_label(label: &str) -> Bytes {
    encode_call(sig::AVAILABLE_LABEL, &[Token::String(label)])
}

#[must_use]
pub fn rent_price(label: &str, duration: u64) -> Bytes {
    encode_call(sig::RENT_PRICE, &[Token::String(label), Token::Uint(u128::from(duration))])
}

#[must_use]
pub fn min_commitment_age() -> Bytes {
    encode_call(sig::MIN_COMMITMENT_AGE, &[])
}

#[must_use]
pub fn max_commitment_age() -> Bytes {
    encode_call(sig::MAX_COMMITMENT_AGE, &[])
}

#[must_use]
pub fn commitments(commitment: B256) -> Bytes {
    encode_call(sig::COMMITMENTS, &[Token::Word(commitment)])
}

#[must_use]
pub fn make_commitment(label: &str, owner: Address, secret: B256) -> Bytes {
    encode_call(
        sig::MAKE_COMMITMENT,
        &[Token::String(label), Token::Address(owner), Token::Word(secret)],
    )
}

#[must_use]
pub fn make_commitment_with_config(
    label: &str,
    owner: Address,
    secret: B256,
    resolver: Address,
    addr: Address,
) -> Bytes {
    encode_call(
        sig::MAKE_COMMITMENT_WITH_CONFIG,
        &[
            Token::String(label),
            Token::Address(owner),
            Token::Word(secret),
            Token::Address(resolver),
            Token::Address(addr),
        ],
    )
}

// Writes

#[must_use]
pub fn release_deed(registrar: Address, label_hash: B256) -> TxRequest {
    TxRequest::new(registrar, encode_call(sig::RELEASE_DEED, &[Token::Word(label_hash)]))
}

#[must_use]
pub fn safe_transfer_from(
    registrar: Address,
    from: Address,
    to: Address,
    label_hash: B256,
) -> TxRequest {
    TxRequest::new(
        registrar,
        encode_call(
            sig::SAFE_TRANSFER_FROM,
            &[Token::Address(from), Token::Address(to), Token::Word(label_hash)],
        ),
    )
}

#[must_use]
pub fn reclaim(registrar: Address, label_hash: B256, owner: Address) -> TxRequest {
    TxRequest::new(
        registrar,
        encode_call(sig::RECLAIM, &[Token::Word(label_hash), Token::Address(owner)]),
    )
}

#[must_use]
pub fn commit(controller: Address, commitment: B256) -> TxRequest {
    TxRequest::new(controller, encode_call(sig::COMMIT, &[Token::Word(commitment)]))
}

#[must_use]
pub fn register(
    controller: Address,
    label: &str,
    owner: Address,
    duration: u64,
    secret: B256,
) -> TxRequest {
    TxRequest::new(
        controller,
        encode_call(
            sig::REGISTER,
            &[
                Token::String(label),
                Token::Address(owner),
                Token::Uint(u128::from(duration)),
                Token::Word(secret),
            ],
        ),
    )
}

#[must_use]
pub fn register_with_config(
    controller: Address,
    label: &str,
    owner: Address,
    duration: u64,
    secret: B256,
    resolver: Address,
    addr: Address,
) -> TxRequest {
    TxRequest::new(
        controller,
        encode_call(
            sig::REGISTER_WITH_CONFIG,
            &[
                Token::String(label),
                Token::Address(owner),
                Token::Uint(u128::from(duration)),
                Token::Word(secret),
                Token::Address(resolver),
                Token::Address(addr),
            ],
        ),
    )
}

#[must_use]
pub fn renew(controller: Address, label: &str, duration: u64) -> TxRequest {
    TxRequest::new(
        controller,
        encode_call(sig::RENEW, &[Token::String(label), Token::Uint(u128::from(duration))]),
    )
}

#[must_use]
pub fn dns_claim(registrar: Address, encoded_name: &[u8], proof_data: &[u8]) -> TxRequest {
    TxRequest::new(
        registrar,
        encode_call(sig::DNS_CLAIM, &[Token::Bytes(encoded_name), Token::Bytes(proof_data)]),
    )
}

#[must_use]
pub fn dns_prove_and_claim(
    registrar: Address,
    encoded_name: &[u8],
    proof: &[u8],
    proof_data: &[u8],
) -> TxRequest {
    TxRequest::new(
        registrar,
        encode_call(
            sig::DNS_PROVE_AND_CLAIM,
            &[Token::Bytes(encoded_name), Token::Bytes(proof), Token::Bytes(proof_data)],
        ),
    )
}
