//! Placeholder wallet
//!
//! Stands in for a real chain integration: connecting yields a random dummy
//! address and signatures are fixed strings. Claiming moves banked points out
//! of the score ledger.

use std::fmt;

use rand::Rng;

use crate::sim::{GameEvent, GameState};

/// Reasons a wallet request is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet connected
    NotConnected,
    /// Ledger holds no banked points
    NothingToClaim,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "wallet is not connected"),
            Self::NothingToClaim => write!(f, "no points to claim"),
        }
    }
}

impl std::error::Error for WalletError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConnection {
    pub address: String,
}

#[derive(Debug, Clone, Default)]
pub struct Wallet {
    connection: Option<WalletConnection>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect with a random dummy address; reconnecting keeps the old one
    pub fn connect<R: Rng>(&mut self, rng: &mut R) -> &WalletConnection {
        self.connection.get_or_insert_with(|| {
            let address = dummy_address(rng);
            log::info!("Wallet connected: {}", address);
            WalletConnection { address }
        })
    }

    pub fn disconnect(&mut self) {
        if self.connection.take().is_some() {
            log::info!("Wallet disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn address(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.address.as_str())
    }

    /// Placeholder signature over a final score
    pub fn sign_score(&self, score: u64) -> Result<String, WalletError> {
        if !self.is_connected() {
            return Err(WalletError::NotConnected);
        }
        log::debug!("Signing score {}", score);
        Ok(format!("0x_placeholder_signature_for_score_{score}"))
    }

    /// Take every banked point from the ledger
    pub fn claim_points(&self, state: &mut GameState) -> Result<u64, WalletError> {
        let address = self.address().ok_or(WalletError::NotConnected)?;
        if state.ledger.claimable_points == 0 {
            return Err(WalletError::NothingToClaim);
        }
        let points = state.ledger.take_claimable();
        log::info!("Claimed {} points to {}", points, address);
        state.push_event(GameEvent::PointsClaimed { points });
        Ok(points)
    }
}

/// `0x` followed by 40 lowercase hex digits
fn dummy_address<R: Rng>(rng: &mut R) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut address = String::with_capacity(42);
    address.push_str("0x");
    for _ in 0..40 {
        address.push(HEX[rng.random_range(0..16)] as char);
    }
    address
}
