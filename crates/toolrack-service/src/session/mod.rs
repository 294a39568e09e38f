//! Session pairing.

pub mod pairing;

pub use pairing::PairingResolver;
