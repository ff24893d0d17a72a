use rug::Float;
use std::fmt;

/// Precision, in bits, of the mantissa backing a [Scale].
pub const SCALE_PRECISION: u32 = 128;

/// Scaling factor of an encoded message, kept in arbitrary precision so that
/// products of scales along a circuit do not lose bits.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Scale(Float);

impl Scale {
    pub fn new(value: f64) -> Self {
        Scale(Float::with_val(SCALE_PRECISION, value))
    }

    /// Returns 2^log2.
    pub fn from_log2(log2: u32) -> Self {
        Scale(Float::with_val(SCALE_PRECISION, 1) << log2)
    }

    pub fn value(&self) -> f64 {
        self.0.to_f64()
    }

    pub fn log2(&self) -> f64 {
        Float::with_val(SCALE_PRECISION, self.0.log2_ref()).to_f64()
    }

    pub fn float(&self) -> &Float {
        &self.0
    }

    pub fn mul(&self, other: &Scale) -> Scale {
        Scale(Float::with_val(SCALE_PRECISION, &self.0 * &other.0))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::new(1.0)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2^{:.4}", self.log2())
    }
}

#[cfg(test)]
mod tests {
    use super::Scale;

    #[test]
    fn powers_of_two_are_exact() {
        let s: Scale = Scale::from_log2(40);
        assert_eq!(s.value(), (1u64 << 40) as f64);
        assert_eq!(s.log2(), 40.0);
        assert_eq!(s, Scale::new(1099511627776.0));
    }

    #[test]
    fn product_keeps_precision_beyond_f64() {
        let s: Scale = Scale::from_log2(60).mul(&Scale::from_log2(60));
        assert_eq!(s.log2(), 120.0);
        assert_eq!(s.to_string(), "2^120.0000");
    }
}
