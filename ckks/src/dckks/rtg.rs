use crate::parameters::Parameters;

/// State of the collective rotation-key generation protocol.
#[derive(Clone)]
pub struct RtgProtocol {
    params: Parameters,
    beta: usize,
}

impl RtgProtocol {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
            beta: params.decomposition_count(),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn beta(&self) -> usize {
        self.beta
    }

    /// Galois element of the automorphism X -> X^(5^k), rotating the slots
    /// to the left by k.
    pub fn galois_element(&self, k: i64) -> u64 {
        let two_n: u64 = 2 * self.params.n() as u64;
        let order: i64 = (self.params.n() / 2) as i64;
        let mut exp: u64 = k.rem_euclid(order) as u64;
        let mut base: u64 = 5;
        let mut gal_el: u64 = 1;
        while exp > 0 {
            if exp & 1 == 1 {
                gal_el = gal_el * base % two_n;
            }
            base = base * base % two_n;
            exp >>= 1;
        }
        gal_el
    }
}

#[cfg(test)]
mod tests {
    use super::RtgProtocol;
    use crate::parameters::tests::test_literal;
    use crate::parameters::Parameters;

    #[test]
    fn beta_and_galois_elements() {
        let params: Parameters = Parameters::new(test_literal()).unwrap();
        let rtg: RtgProtocol = RtgProtocol::new(&params);
        assert_eq!(rtg.beta(), 3);
        assert_eq!(rtg.galois_element(0), 1);
        assert_eq!(rtg.galois_element(1), 5);
        assert_eq!(rtg.galois_element(2), 25);
        // 5 has order n/2 = 8 modulo 2n = 32.
        assert_eq!(rtg.galois_element(8), 1);
        assert_eq!(rtg.galois_element(-1), rtg.galois_element(7));
    }
}
