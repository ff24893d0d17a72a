use crate::error::Error;
use crate::poly::PolyQP;
use crate::scale::Scale;
use math::modulus::prime_generation::NTTFriendlyPrimesGenerator;
use math::poly::PolyRNS;
use math::ring::{RingQP, RingRNS};
use rug::Integer;
use std::sync::Arc;
use tracing::debug;

pub use math::ring::MAX_LOG_N;
/// Largest bit size of a single modulus.
pub const MAX_LOG_MODULUS: u64 = 61;
/// Default standard deviation of the error distribution.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// User-facing description of a CKKS parameter set. Moduli are given by
/// their bit sizes and generated deterministically.
#[derive(Clone, Debug, PartialEq)]
pub struct ParametersLiteral {
    pub log_n: usize,
    pub log_q: Vec<u64>,
    pub log_p: Vec<u64>,
    /// Hamming weight of the secret.
    pub h: usize,
    pub sigma: f64,
    pub log_slots: usize,
    pub log_scale: u32,
}

#[derive(Clone)]
pub struct Parameters {
    literal: ParametersLiteral,
    q: Vec<u64>,
    p: Vec<u64>,
    ring_qp: RingQP,
}

impl Parameters {
    pub fn new(literal: ParametersLiteral) -> Result<Self, Error> {
        validate(&literal)?;

        let (q, p) = generate_moduli(&literal)?;

        let n: usize = 1 << literal.log_n;
        let ring_q: Arc<RingRNS<u64>> = Arc::new(RingRNS::new(n, &q)?);
        let ring_p: Arc<RingRNS<u64>> = Arc::new(RingRNS::new(n, &p)?);
        let ring_qp: RingQP = RingQP::new(ring_q, ring_p)?;

        debug!(
            log_n = literal.log_n,
            q_count = q.len(),
            p_count = p.len(),
            log_scale = literal.log_scale,
            "ckks parameters"
        );

        Ok(Self {
            literal,
            q,
            p,
            ring_qp,
        })
    }

    pub fn literal(&self) -> &ParametersLiteral {
        &self.literal
    }

    pub fn n(&self) -> usize {
        1 << self.literal.log_n
    }

    pub fn log_n(&self) -> usize {
        self.literal.log_n
    }

    pub fn log_slots(&self) -> usize {
        self.literal.log_slots
    }

    pub fn max_level(&self) -> usize {
        self.q.len() - 1
    }

    pub fn q_count(&self) -> usize {
        self.q.len()
    }

    pub fn p_count(&self) -> usize {
        self.p.len()
    }

    pub fn q(&self) -> &[u64] {
        &self.q
    }

    pub fn p(&self) -> &[u64] {
        &self.p
    }

    /// Bit length of the product of all moduli of Q and P.
    pub fn log_qp(&self) -> u64 {
        let qp: Integer = self
            .q
            .iter()
            .chain(self.p.iter())
            .fold(Integer::from(1), |acc, q| acc * *q);
        qp.significant_bits() as u64
    }

    pub fn sigma(&self) -> f64 {
        self.literal.sigma
    }

    pub fn h(&self) -> usize {
        self.literal.h
    }

    pub fn default_scale(&self) -> Scale {
        Scale::from_log2(self.literal.log_scale)
    }

    pub fn ring_q(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_qp.ring_q
    }

    pub fn ring_p(&self) -> &Arc<RingRNS<u64>> {
        &self.ring_qp.ring_p
    }

    pub fn ring_qp(&self) -> &RingQP {
        &self.ring_qp
    }

    /// Number of digits of the RNS gadget decomposition: ceil(#Q / #P).
    pub fn decomposition_count(&self) -> usize {
        self.q_count().div_ceil(self.p_count())
    }

    pub fn check_level(&self, level: usize) -> Result<(), Error> {
        if level > self.max_level() {
            return Err(Error::InvalidLevel {
                level,
                max: self.max_level(),
            });
        }
        Ok(())
    }

    /// Checks that every operand has the degree of these parameters and
    /// reaches the top level of both Q and P.
    pub fn check_poly_qp(&self, polys: &[&PolyQP]) -> Result<(), Error> {
        for poly in polys {
            check_operand(self.ring_q(), &poly.q.read_recursive())?;
            check_operand(self.ring_p(), &poly.p.read_recursive())?;
        }
        Ok(())
    }
}

fn check_operand(ring: &RingRNS<u64>, poly: &PolyRNS<u64>) -> Result<(), Error> {
    if poly.n() != ring.n() || poly.level() < ring.level() {
        return Err(Error::OperandMismatch {
            n: poly.n(),
            level: poly.level(),
            ring_n: ring.n(),
            ring_level: ring.level(),
        });
    }
    Ok(())
}

fn validate(literal: &ParametersLiteral) -> Result<(), Error> {
    let invalid = |msg: String| Err(Error::InvalidParameters(msg));

    if literal.log_n == 0 || literal.log_n > MAX_LOG_N {
        return invalid(format!("log_n={} not in [1, {}]", literal.log_n, MAX_LOG_N));
    }
    if literal.log_q.is_empty() {
        return invalid("log_q is empty".to_string());
    }
    if literal.log_p.is_empty() {
        return invalid("log_p is empty".to_string());
    }
    let min_bits: u64 = literal.log_n as u64 + 2;
    if let Some(bits) = literal
        .log_q
        .iter()
        .chain(literal.log_p.iter())
        .find(|bits| **bits < min_bits || **bits > MAX_LOG_MODULUS)
    {
        return invalid(format!(
            "modulus bit size {} not in [{}, {}]",
            bits, min_bits, MAX_LOG_MODULUS
        ));
    }
    if literal.h > 1 << literal.log_n {
        return invalid(format!("h={} > n={}", literal.h, 1usize << literal.log_n));
    }
    if !(literal.sigma.is_finite() && literal.sigma > 0.0) {
        return invalid(format!("sigma={} is not a positive number", literal.sigma));
    }
    if literal.log_slots >= literal.log_n {
        return invalid(format!(
            "log_slots={} >= log_n={}",
            literal.log_slots, literal.log_n
        ));
    }
    if literal.log_scale == 0 || literal.log_scale > 1000 {
        return invalid(format!("log_scale={} not in [1, 1000]", literal.log_scale));
    }
    Ok(())
}

/// Generates NTT-friendly primes for every requested bit size; Q and P moduli
/// of the same bit size are drawn from a single generator so they are distinct.
fn generate_moduli(literal: &ParametersLiteral) -> Result<(Vec<u64>, Vec<u64>), Error> {
    let nth_root: u64 = 2 << literal.log_n;

    let mut bit_sizes: Vec<u64> = literal
        .log_q
        .iter()
        .chain(literal.log_p.iter())
        .copied()
        .collect();
    bit_sizes.sort_unstable();
    bit_sizes.dedup();

    let mut primes: Vec<(u64, Vec<u64>)> = Vec::with_capacity(bit_sizes.len());
    for bits in bit_sizes {
        let count: usize = literal
            .log_q
            .iter()
            .chain(literal.log_p.iter())
            .filter(|b| **b == bits)
            .count();
        let mut generator: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(bits, nth_root);
        // Reversed so that pop() hands them out in generation order.
        let mut list: Vec<u64> = generator.next_alternating_primes(count)?;
        list.reverse();
        primes.push((bits, list));
    }

    let mut take = |bits: u64| -> u64 {
        primes
            .iter_mut()
            .find(|(b, _)| *b == bits)
            .and_then(|(_, list)| list.pop())
            .unwrap_or_default()
    };

    let q: Vec<u64> = literal.log_q.iter().map(|bits| take(*bits)).collect();
    let p: Vec<u64> = literal.log_p.iter().map(|bits| take(*bits)).collect();
    Ok((q, p))
}
