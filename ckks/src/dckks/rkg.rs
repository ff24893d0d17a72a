use crate::parameters::Parameters;

/// State of the collective relinearisation-key generation protocol.
#[derive(Clone)]
pub struct RkgProtocol {
    params: Parameters,
    beta: usize,
}

impl RkgProtocol {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
            beta: params.decomposition_count(),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Number of gadget digits of the key-switching keys.
    pub fn beta(&self) -> usize {
        self.beta
    }
}
