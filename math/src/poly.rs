use std::cmp::PartialEq;

/// Coefficients of a single polynomial modulo one prime.
#[derive(Clone, Debug, Eq, Default)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    /// Copies other into self; both must have the same degree.
    pub fn copy_from(&mut self, other: &Poly<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        assert_eq!(
            self.n(),
            other.n(),
            "invalid argument: self.n()={} != other.n()={}",
            self.n(),
            other.n()
        );
        self.0.copy_from_slice(&other.0)
    }
}

impl<O: PartialEq> PartialEq for Poly<O> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.0 == other.0)
    }
}

/// A polynomial in RNS representation: one row of coefficients per modulus.
/// Its level is the number of rows minus one.
#[derive(Clone, Debug, Eq, Default)]
pub struct PolyRNS<O>(pub Vec<Poly<O>>);

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize, level: usize) -> Self {
        Self((0..level + 1).map(|_| Poly::new(n)).collect())
    }

    pub fn n(&self) -> usize {
        self.0.first().map(|p| p.n()).unwrap_or(0)
    }

    pub fn level(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &self.0[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &mut self.0[level]
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    /// Copies the rows shared by self and other, i.e. up to the smaller level.
    pub fn copy(&mut self, other: &PolyRNS<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        self.copy_level(self.level().min(other.level()), other);
    }

    /// Copies rows 0..=level of other into self.
    pub fn copy_level(&mut self, level: usize, other: &PolyRNS<O>) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        assert!(
            level <= other.level(),
            "invalid argument level: level={} > other.level()={}",
            level,
            other.level()
        );
        (0..level + 1).for_each(|i| self.at_mut(i).copy_from(other.at(i)))
    }

    /// Copies the row src_level of other into the row dst_level of self.
    pub fn copy_row(&mut self, dst_level: usize, other: &PolyRNS<O>, src_level: usize) {
        self.at_mut(dst_level).copy_from(other.at(src_level))
    }
}

impl<O: PartialEq> PartialEq for PolyRNS<O> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.0 == other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::PolyRNS;

    #[test]
    fn copy_stops_at_smaller_level() {
        let mut a: PolyRNS<u64> = PolyRNS::new(4, 2);
        let mut b: PolyRNS<u64> = PolyRNS::new(4, 1);
        b.set_all(&7);
        a.copy(&b);
        assert_eq!(a.at(0).0, vec![7; 4]);
        assert_eq!(a.at(1).0, vec![7; 4]);
        assert_eq!(a.at(2).0, vec![0; 4]);
    }

    #[test]
    #[should_panic]
    fn copy_across_degrees_panics() {
        let mut a: PolyRNS<u64> = PolyRNS::new(16, 2);
        let b: PolyRNS<u64> = PolyRNS::new(32, 0);
        a.copy(&b);
    }

    #[test]
    fn copy_row_moves_a_single_row() {
        let mut a: PolyRNS<u64> = PolyRNS::new(4, 1);
        let mut b: PolyRNS<u64> = PolyRNS::new(4, 1);
        b.at_mut(1).set_all(&3);
        a.copy_row(0, &b, 1);
        assert_eq!(a.at(0).0, vec![3; 4]);
        assert_eq!(a.at(1).0, vec![0; 4]);
    }
}
