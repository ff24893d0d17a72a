use crate::parameters::Parameters;
use crate::poly::PolyQP;

/// Secret key over QP, stored in the NTT domain and in Montgomery form.
#[derive(Clone)]
pub struct SecretKey {
    pub value: PolyQP,
}

impl SecretKey {
    /// Returns the zero secret key.
    pub fn new(params: &Parameters) -> Self {
        Self {
            value: PolyQP::new(params.ring_qp()),
        }
    }
}

/// Public key (b, a) over QP with b = -a*s + e.
#[derive(Clone)]
pub struct PublicKey {
    pub value: [PolyQP; 2],
}

impl PublicKey {
    pub fn new(params: &Parameters) -> Self {
        Self {
            value: [PolyQP::new(params.ring_qp()), PolyQP::new(params.ring_qp())],
        }
    }
}
