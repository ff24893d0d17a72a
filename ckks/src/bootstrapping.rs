//! Named CKKS parameter sets that support bootstrapping.
//!
//! The modulus chain of each set is laid out as: one base modulus, the
//! residual moduli at the default scale, then the moduli consumed by the
//! slots-to-coefficients, modular-reduction and coefficients-to-slots steps.

use crate::parameters::{ParametersLiteral, DEFAULT_SIGMA};

/// Depth budget and ephemeral secret of the bootstrapping circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootstrappingParameters {
    pub ephemeral_secret_weight: usize,
    pub slots_to_coeffs_depth: usize,
    pub eval_mod_depth: usize,
    pub coeffs_to_slots_depth: usize,
}

impl BootstrappingParameters {
    /// Number of levels consumed by one bootstrapping.
    pub fn depth(&self) -> usize {
        self.slots_to_coeffs_depth + self.eval_mod_depth + self.coeffs_to_slots_depth
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParametersSet {
    pub name: &'static str,
    pub log_n: usize,
    pub log_q: &'static [u64],
    pub log_p: &'static [u64],
    pub h: usize,
    pub log_slots: usize,
    pub log_scale: u32,
    pub bootstrapping: BootstrappingParameters,
}

impl ParametersSet {
    pub fn literal(&self) -> ParametersLiteral {
        ParametersLiteral {
            log_n: self.log_n,
            log_q: self.log_q.to_vec(),
            log_p: self.log_p.to_vec(),
            h: self.h,
            sigma: DEFAULT_SIGMA,
            log_slots: self.log_slots,
            log_scale: self.log_scale,
        }
    }
}

const EPHEMERAL_SECRET_WEIGHT: usize = 32;

const fn bootstrapping(stc: usize, eval_mod: usize, cts: usize) -> BootstrappingParameters {
    BootstrappingParameters {
        ephemeral_secret_weight: EPHEMERAL_SECRET_WEIGHT,
        slots_to_coeffs_depth: stc,
        eval_mod_depth: eval_mod,
        coeffs_to_slots_depth: cts,
    }
}

#[rustfmt::skip]
const N16_QP1546_LOG_Q: [u64; 27] = [57, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 39, 39, 39, 58, 58, 58, 58, 58, 58, 58, 58, 56, 56, 56, 56];
#[rustfmt::skip]
const N16_QP1547_LOG_Q: [u64; 26] = [55, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 42, 42, 42, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56];
#[rustfmt::skip]
const N16_QP1553_LOG_Q: [u64; 32] = [55, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 60, 60, 60, 60, 60, 60, 60, 60, 58, 58, 58];
#[rustfmt::skip]
const N15_QP768_LOG_Q: [u64; 17] = [55, 32, 32, 32, 32, 32, 32, 30, 30, 50, 50, 50, 50, 50, 50, 50, 50];

#[rustfmt::skip]
const N16_QP1767_LOG_Q: [u64; 31] = [57, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 40, 39, 39, 39, 58, 58, 58, 58, 58, 58, 58, 58, 56, 56, 56, 56];
#[rustfmt::skip]
const N16_QP1788_LOG_Q: [u64; 30] = [55, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 42, 42, 42, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56, 56];
#[rustfmt::skip]
const N16_QP1793_LOG_Q: [u64; 38] = [54, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 60, 60, 60, 60, 60, 60, 60, 60, 58, 58, 58];
#[rustfmt::skip]
const N15_QP880_LOG_Q: [u64; 20] = [59, 32, 32, 32, 32, 32, 32, 32, 32, 32, 30, 30, 52, 52, 52, 52, 52, 52, 50, 50];

const LOG_P_4: [u64; 4] = [61; 4];
const LOG_P_5: [u64; 5] = [61; 5];
const LOG_P_1: [u64; 1] = [61; 1];

/// Sets with a sparse secret of Hamming weight 192.
pub const DEFAULT_SPARSE: [ParametersSet; 4] = [
    ParametersSet {
        name: "N16QP1546H192H32",
        log_n: 16,
        log_q: &N16_QP1546_LOG_Q,
        log_p: &LOG_P_4,
        h: 192,
        log_slots: 15,
        log_scale: 40,
        bootstrapping: bootstrapping(3, 8, 4),
    },
    ParametersSet {
        name: "N16QP1547H192H32",
        log_n: 16,
        log_q: &N16_QP1547_LOG_Q,
        log_p: &LOG_P_4,
        h: 192,
        log_slots: 15,
        log_scale: 45,
        bootstrapping: bootstrapping(3, 8, 4),
    },
    ParametersSet {
        name: "N16QP1553H192H32",
        log_n: 16,
        log_q: &N16_QP1553_LOG_Q,
        log_p: &LOG_P_4,
        h: 192,
        log_slots: 15,
        log_scale: 30,
        bootstrapping: bootstrapping(3, 8, 3),
    },
    ParametersSet {
        name: "N15QP768H192H32",
        log_n: 15,
        log_q: &N15_QP768_LOG_Q,
        log_p: &LOG_P_1,
        h: 192,
        log_slots: 14,
        log_scale: 32,
        bootstrapping: bootstrapping(2, 6, 2),
    },
];

/// Sets with a dense ternary secret.
pub const DEFAULT_DENSE: [ParametersSet; 4] = [
    ParametersSet {
        name: "N16QP1767H32768H32",
        log_n: 16,
        log_q: &N16_QP1767_LOG_Q,
        log_p: &LOG_P_5,
        h: 32768,
        log_slots: 15,
        log_scale: 40,
        bootstrapping: bootstrapping(3, 8, 4),
    },
    ParametersSet {
        name: "N16QP1788H32768H32",
        log_n: 16,
        log_q: &N16_QP1788_LOG_Q,
        log_p: &LOG_P_5,
        h: 32768,
        log_slots: 15,
        log_scale: 45,
        bootstrapping: bootstrapping(3, 8, 4),
    },
    ParametersSet {
        name: "N16QP1793H32768H32",
        log_n: 16,
        log_q: &N16_QP1793_LOG_Q,
        log_p: &LOG_P_5,
        h: 32768,
        log_slots: 15,
        log_scale: 30,
        bootstrapping: bootstrapping(3, 8, 3),
    },
    ParametersSet {
        name: "N15QP880H16384H32",
        log_n: 15,
        log_q: &N15_QP880_LOG_Q,
        log_p: &LOG_P_1,
        h: 16384,
        log_slots: 14,
        log_scale: 32,
        bootstrapping: bootstrapping(2, 6, 2),
    },
];

/// Looks up a named set; returns None when index is outside the table.
pub fn get(index: usize, sparse: bool) -> Option<&'static ParametersSet> {
    if sparse {
        DEFAULT_SPARSE.get(index)
    } else {
        DEFAULT_DENSE.get(index)
    }
}
