use crate::error::Error;
use crate::metadata::{MetaData, SharedMeta};
use crate::parameters::Parameters;
use crate::poly::{copy_shared, shared, PolyQP, SharedPoly};
use crate::scale::Scale;

/// Largest ciphertext degree accepted by [Ciphertext::new].
pub const MAX_DEGREE: usize = 16;

/// An RLWE ciphertext over Q: degree + 1 polynomials at a common level.
#[derive(Clone)]
pub struct Ciphertext {
    pub value: Vec<SharedPoly>,
    pub meta: SharedMeta,
}

impl Ciphertext {
    /// Returns a zero ciphertext in the NTT domain at the default scale.
    pub fn new(params: &Parameters, degree: usize, level: usize) -> Result<Self, Error> {
        if degree > MAX_DEGREE {
            return Err(Error::InvalidDegree {
                degree,
                max: MAX_DEGREE,
            });
        }
        params.check_level(level)?;
        let ring_q = params.ring_q();
        Ok(Self {
            value: (0..degree + 1)
                .map(|_| shared(ring_q.new_polyrns_at_level(level)))
                .collect(),
            meta: MetaData::new(params.default_scale(), true, false).shared(),
        })
    }

    /// Level of the first polynomial; the others are kept at the same level.
    pub fn level(&self) -> usize {
        self.value[0].read().level()
    }

    pub fn degree(&self) -> usize {
        self.value.len() - 1
    }

    pub fn scale(&self) -> Scale {
        self.meta.read().scale.clone()
    }

    /// Returns the i-th polynomial. The returned handle aliases the ciphertext.
    pub fn poly(&self, i: usize) -> Result<SharedPoly, Error> {
        self.value.get(i).cloned().ok_or(Error::InvalidIndex {
            index: i,
            degree: self.degree(),
        })
    }

    /// Deep copy sharing no storage with self.
    pub fn copy_new(&self) -> Self {
        Self {
            value: self.value.iter().map(|p| shared(p.read().clone())).collect(),
            meta: self.meta.read().clone().shared(),
        }
    }

    /// Copies the polynomials and metadata of other into self.
    pub fn copy_from(&self, other: &Ciphertext) {
        self.value
            .iter()
            .zip(other.value.iter())
            .for_each(|(a, b)| copy_shared(a, b));
        self.set_meta(&other.meta.read().clone());
    }

    pub fn set_meta(&self, meta: &MetaData) {
        *self.meta.write() = meta.clone();
    }
}

/// An RLWE ciphertext of degree one over the extended basis QP.
#[derive(Clone)]
pub struct CiphertextQP {
    pub value: [PolyQP; 2],
    pub meta: SharedMeta,
}

impl CiphertextQP {
    pub fn new(params: &Parameters) -> Self {
        Self {
            value: [PolyQP::new(params.ring_qp()), PolyQP::new(params.ring_qp())],
            meta: MetaData::new(params.default_scale(), true, false).shared(),
        }
    }

    pub fn poly_qp(&self, i: usize) -> Result<PolyQP, Error> {
        self.value
            .get(i)
            .cloned()
            .ok_or(Error::InvalidIndex { index: i, degree: 1 })
    }

    pub fn copy_new(&self) -> Self {
        Self {
            value: [self.value[0].copy_new(), self.value[1].copy_new()],
            meta: self.meta.read().clone().shared(),
        }
    }

    pub fn set_meta(&self, meta: &MetaData) {
        *self.meta.write() = meta.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::{Ciphertext, CiphertextQP};
    use crate::error::Error;
    use crate::parameters::tests::test_literal;
    use crate::parameters::Parameters;
    use std::sync::Arc;

    #[test]
    fn new_ciphertext() {
        let params: Parameters = Parameters::new(test_literal()).unwrap();
        let ct: Ciphertext = Ciphertext::new(&params, 1, 1).unwrap();
        assert_eq!(ct.degree(), 1);
        assert_eq!(ct.level(), 1);
        assert!(ct.meta.read().is_ntt);
        assert_eq!(ct.scale(), params.default_scale());

        assert!(matches!(
            Ciphertext::new(&params, 1, 3),
            Err(Error::InvalidLevel { level: 3, max: 2 })
        ));
        assert!(matches!(
            ct.poly(2),
            Err(Error::InvalidIndex { index: 2, degree: 1 })
        ));
    }

    #[test]
    fn poly_aliases_and_copy_does_not() {
        let params: Parameters = Parameters::new(test_literal()).unwrap();
        let ct: Ciphertext = Ciphertext::new(&params, 1, 2).unwrap();
        let p1 = ct.poly(1).unwrap();
        assert!(Arc::ptr_eq(&p1, &ct.value[1]));

        let copy: Ciphertext = ct.copy_new();
        p1.write().at_mut(0).0[0] = 7;
        assert_eq!(ct.value[1].read().at(0).0[0], 7);
        assert_eq!(copy.value[1].read().at(0).0[0], 0);

        copy.meta.write().is_ntt = false;
        assert!(ct.meta.read().is_ntt);
    }

    #[test]
    fn ciphertext_qp_copy() {
        let params: Parameters = Parameters::new(test_literal()).unwrap();
        let ct: CiphertextQP = CiphertextQP::new(&params);
        ct.value[0].q.write().at_mut(1).0[3] = 11;
        let copy: CiphertextQP = ct.copy_new();
        assert!(copy.value[0].equals(&ct.value[0]));
        assert!(!Arc::ptr_eq(&copy.value[0].q, &ct.value[0].q));
        assert!(ct.poly_qp(2).is_err());
    }
}
