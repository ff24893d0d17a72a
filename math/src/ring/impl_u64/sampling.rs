use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use rand_distr::Distribution;
use sampling::distributions::Ternary;
use sampling::source::Source;

impl Ring<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut Poly<u64>) {
        let max: u64 = self.modulus.q;
        let mask: u64 = max.mask();
        a.0.iter_mut()
            .for_each(|a| *a = source.next_u64n(max, mask));
    }
}

impl RingRNS<u64> {
    /// Fills the rows of a that the ring covers with uniform values mod q_i.
    pub fn fill_uniform(&self, source: &mut Source, a: &mut PolyRNS<u64>) {
        let level: usize = self.level().min(a.level());
        (0..level + 1).for_each(|i| self.0[i].fill_uniform(source, a.at_mut(i)));
    }

    /// Samples one rounded value per coefficient from dist, rejecting values
    /// whose magnitude exceeds bound, and writes it to every row of a.
    pub fn fill_dist_f64<D: Distribution<f64>>(
        &self,
        source: &mut Source,
        dist: D,
        bound: f64,
        a: &mut PolyRNS<u64>,
    ) {
        let level: usize = self.level().min(a.level());
        (0..self.n()).for_each(|j| {
            let mut dist_f64: f64 = dist.sample(source);
            while dist_f64.abs() > bound {
                dist_f64 = dist.sample(source)
            }
            let dist_i64: i64 = dist_f64.round() as i64;
            (0..level + 1).for_each(|i| {
                let q: u64 = self.0[i].q();
                let r: u64 = dist_i64.unsigned_abs() % q;
                a.at_mut(i).0[j] = if dist_i64 < 0 && r != 0 { q - r } else { r };
            });
        });
    }

    /// Samples a ternary polynomial and writes it to every row of a.
    pub fn fill_ternary(&self, source: &mut Source, ternary: Ternary, a: &mut PolyRNS<u64>) {
        let mut values: Vec<i8> = vec![0; self.n()];
        ternary.fill(source, &mut values);
        let level: usize = self.level().min(a.level());
        (0..level + 1).for_each(|i| {
            let q: u64 = self.0[i].q();
            a.at_mut(i)
                .0
                .iter_mut()
                .zip(values.iter())
                .for_each(|(a, v)| {
                    *a = match v {
                        1 => 1,
                        -1 => q - 1,
                        _ => 0,
                    }
                });
        });
    }
}
