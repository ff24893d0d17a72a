//! Multiparty protocols where N parties holding additive shares of a secret
//! jointly produce keys under the ideal secret s = s_1 + ... + s_N.

pub mod ckg;
pub mod rkg;
pub mod rtg;

pub use ckg::{CkgProtocol, CkgShare};
pub use rkg::RkgProtocol;
pub use rtg::RtgProtocol;
