pub mod ntt;

pub trait DFT<O> {
    /// In-place forward transform, output in bit-reversed order.
    fn forward_inplace(&self, x: &mut [O]);
    /// In-place inverse of [DFT::forward_inplace].
    fn backward_inplace(&self, x: &mut [O]);
}
