use rand_core::RngCore;

use crate::source::Source;

/// Ternary samplers over {-1, 0, 1}, returned as signed values the caller
/// maps into its own modulus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ternary {
    /// Each coefficient is non-zero with probability `p`, sign uniform.
    Probability(f64),
    /// Exactly `h` non-zero coefficients, positions and signs uniform.
    HammingWeight(usize),
}

impl Ternary {
    pub fn fill(&self, source: &mut Source, out: &mut [i8]) {
        match self {
            Ternary::Probability(p) => fill_ternary_prob(source, *p, out),
            Ternary::HammingWeight(h) => fill_ternary_hw(source, *h, out),
        }
    }
}

fn fill_ternary_prob(source: &mut Source, p: f64, out: &mut [i8]) {
    assert!(
        (0.0..=1.0).contains(&p),
        "invalid probability: p={} not in [0, 1]",
        p
    );
    out.iter_mut().for_each(|x| {
        *x = if source.next_f64(0.0, 1.0) < p {
            1 - ((source.next_u32() & 1) << 1) as i8
        } else {
            0
        };
    });
}

fn fill_ternary_hw(source: &mut Source, h: usize, out: &mut [i8]) {
    let n: usize = out.len();
    assert!(h <= n, "invalid hamming weight: h={} > n={}", h, n);
    out.fill(0);
    let mask: u64 = (n as u64).next_power_of_two() - 1;
    let mut placed: usize = 0;
    while placed < h {
        let i: usize = source.next_u64n(n as u64, mask) as usize;
        if out[i] == 0 {
            out[i] = 1 - ((source.next_u32() & 1) << 1) as i8;
            placed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_weight_is_exact() {
        let mut source: Source = Source::new([0u8; 32]);
        let mut out: Vec<i8> = vec![0; 256];
        Ternary::HammingWeight(64).fill(&mut source, &mut out);
        assert_eq!(out.iter().filter(|x| **x != 0).count(), 64);
        assert!(out.iter().all(|x| (-1..=1).contains(x)));
    }

    #[test]
    fn probability_zero_is_all_zero() {
        let mut source: Source = Source::new([0u8; 32]);
        let mut out: Vec<i8> = vec![5; 64];
        Ternary::Probability(0.0).fill(&mut source, &mut out);
        assert!(out.iter().all(|x| *x == 0));
    }
}
