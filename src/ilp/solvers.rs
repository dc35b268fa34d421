#[cfg(feature = "coin_cbc")]
pub mod coin_cbc;
