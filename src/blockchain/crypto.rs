use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Failed to sign message: {0}")]
    SigningError(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Decoding error: {0}")]
    DecodingError(#[from] hex::FromHexError),
}

/// Represents a wallet address (uncompressed secp256k1 public key in hex format)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Creates a new address from a public key
    pub fn from_public_key(public_key: &VerifyingKey) -> Self {
        let point = public_key.to_encoded_point(false);
        Address(hex::encode(point.as_bytes()))
    }

    /// Converts the address back to the public key it encodes
    pub fn to_public_key(&self) -> Result<VerifyingKey, CryptoError> {
        let bytes = hex::decode(&self.0)?;

        VerifyingKey::from_sec1_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    /// Parses an address, rejecting strings that are not a valid public key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = Address(s.to_lowercase());
        address.to_public_key()?;
        Ok(address)
    }
}

/// Represents a DER-encoded ECDSA signature in hex format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalSignature(pub String);

impl DigitalSignature {
    /// Creates a new digital signature from a signature
    pub fn from_signature(signature: &Signature) -> Self {
        DigitalSignature(hex::encode(signature.to_der().as_bytes()))
    }

    /// Converts the digital signature to a signature
    pub fn to_signature(&self) -> Result<Signature, CryptoError> {
        let bytes = hex::decode(&self.0)?;

        Signature::from_der(&bytes).map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Anything that can sign a transaction digest on behalf of an address.
pub trait KeyPair {
    /// The address derived from the public half of the key pair
    fn address(&self) -> &Address;

    /// Signs a 32-byte content digest
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<DigitalSignature, CryptoError>;
}

/// Represents a wallet holding a secp256k1 key pair in memory
#[derive(Debug, Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    address: Address,
}

impl Wallet {
    /// Creates a new wallet with a random keypair
    pub fn new() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Creates a wallet from an existing secret key
    pub fn from_secret_key(secret_key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret_key_bytes)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;

        Ok(Self::from_signing_key(signing_key))
    }

    /// Creates a wallet from a hex encoded secret key
    pub fn from_secret_hex(secret_key_hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(secret_key_hex.trim())?;
        Self::from_secret_key(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = *signing_key.verifying_key();
        let address = Address::from_public_key(&verifying_key);

        Wallet {
            signing_key,
            verifying_key,
            address,
        }
    }

    /// Gets the wallet's public key
    pub fn public_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Exports the wallet's secret key as bytes
    pub fn export_secret_key(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPair for Wallet {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<DigitalSignature, CryptoError> {
        let signature: Signature = PrehashSigner::<Signature>::sign_prehash(&self.signing_key, digest)
            .map_err(|e| CryptoError::SigningError(e.to_string()))?;

        Ok(DigitalSignature::from_signature(&signature))
    }
}

/// Verifies a signature over a digest against a public key
pub fn verify_signature(
    public_key: &VerifyingKey,
    digest: &[u8; 32],
    signature: &DigitalSignature,
) -> Result<bool, CryptoError> {
    let signature = signature.to_signature()?;

    match public_key.verify_prehash(digest, &signature) {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}
