use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::crypto::{verify_signature, Address, CryptoError, DigitalSignature, KeyPair};

/// Errors that can occur during transaction operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Signing key does not match the sender address")]
    KeyMismatch,

    #[error("No signature was found")]
    MissingSignature,

    #[error("Transaction already signed")]
    AlreadySigned,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Who a transaction takes value from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    /// Value created by the ledger itself (mining reward); carries no signature
    Issuance,

    /// Value moved out of the `from` account; must be signed by its key
    Transfer { from: Address },
}

/// Represents a transaction in the blockchain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Issuance or transfer, with the sender for the latter
    pub kind: TransactionKind,

    /// Recipient's address
    pub to: Address,

    /// Amount being transferred
    pub amount: f64,

    /// Digital signature of the transaction hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<DigitalSignature>,
}

impl Transaction {
    /// Creates a new unsigned transfer
    ///
    /// # Arguments
    ///
    /// * `from` - The address of the sender
    /// * `to` - The address of the recipient
    /// * `amount` - The amount to transfer
    pub fn new(from: Address, to: Address, amount: f64) -> Self {
        Transaction {
            kind: TransactionKind::Transfer { from },
            to,
            amount,
            signature: None,
        }
    }

    /// Creates a new issuance (mining reward) paying `to`
    pub fn new_issuance(to: Address, amount: f64) -> Self {
        Transaction {
            kind: TransactionKind::Issuance,
            to,
            amount,
            signature: None,
        }
    }

    /// The sender, or `None` for an issuance
    pub fn from_address(&self) -> Option<&Address> {
        match &self.kind {
            TransactionKind::Issuance => None,
            TransactionKind::Transfer { from } => Some(from),
        }
    }

    pub fn is_issuance(&self) -> bool {
        matches!(self.kind, TransactionKind::Issuance)
    }

    /// Amounts must be finite and not negative
    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }

    /// SHA-256 over sender, recipient and amount, in that order.
    /// This is the digest that gets signed.
    fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        // An issuance adds no sender bytes; changing this changes every issuance hash
        if let Some(from) = self.from_address() {
            hasher.update(from.as_str().as_bytes());
        }
        hasher.update(self.to.as_str().as_bytes());
        hasher.update(self.amount.to_string().as_bytes());

        hasher.finalize().into()
    }

    /// Calculates the hash of the transaction
    ///
    /// # Returns
    ///
    /// The SHA-256 hash of the transaction content as a hexadecimal string
    pub fn calculate_hash(&self) -> String {
        hex::encode(self.digest())
    }

    /// Signs the transaction with a key pair
    ///
    /// # Arguments
    ///
    /// * `key_pair` - The key pair belonging to the sender
    ///
    /// # Returns
    ///
    /// Result indicating success or failure
    pub fn sign(&mut self, key_pair: &impl KeyPair) -> Result<(), TransactionError> {
        // Only the owner of the sender address may sign
        match self.from_address() {
            Some(from) if from == key_pair.address() => {}
            _ => return Err(TransactionError::KeyMismatch),
        }

        if self.signature.is_some() {
            return Err(TransactionError::AlreadySigned);
        }

        let signature = key_pair.sign_digest(&self.digest())?;
        self.signature = Some(signature);

        Ok(())
    }

    /// Checks the transaction's signature
    ///
    /// # Returns
    ///
    /// `Ok(true)` for issuances and correctly signed transfers, `Ok(false)`
    /// when the signature does not match the content
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        let from = match &self.kind {
            TransactionKind::Issuance => return Ok(true),
            TransactionKind::Transfer { from } => from,
        };

        let signature = match &self.signature {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(TransactionError::MissingSignature),
        };

        let public_key = from.to_public_key()?;

        verify_signature(&public_key, &self.digest(), signature).map_err(TransactionError::from)
    }
}
