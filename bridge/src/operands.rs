use ckks::SharedPoly;
use math::poly::PolyRNS;
use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
use std::ops::Deref;
use std::sync::Arc;

/// Read access to an input polynomial. When the input is also an output of
/// the same call it is read from a snapshot taken before the output lock.
pub(crate) enum Input<'a> {
    Locked(RwLockReadGuard<'a, PolyRNS<u64>>),
    Snapshot(PolyRNS<u64>),
}

impl Deref for Input<'_> {
    type Target = PolyRNS<u64>;

    fn deref(&self) -> &PolyRNS<u64> {
        match self {
            Input::Locked(guard) => guard,
            Input::Snapshot(poly) => poly,
        }
    }
}

/// Locks input for reading, or snapshots it if it aliases output.
pub(crate) fn read<'a>(input: &'a SharedPoly, output: &SharedPoly) -> Input<'a> {
    if Arc::ptr_eq(input, output) {
        Input::Snapshot(input.read().clone())
    } else {
        // Recursive so that the same polynomial may be passed as two inputs.
        Input::Locked(input.read_recursive())
    }
}

pub(crate) fn write(output: &SharedPoly) -> RwLockWriteGuard<'_, PolyRNS<u64>> {
    output.write()
}

/// Runs f on (input, output), snapshotting input when both are the same.
pub(crate) fn unary<R>(
    input: &SharedPoly,
    output: &SharedPoly,
    f: impl FnOnce(&PolyRNS<u64>, &mut PolyRNS<u64>) -> R,
) -> R {
    let a: Input = read(input, output);
    f(&a, &mut write(output))
}

/// Runs f on (a, b, output) with any input aliasing output snapshotted.
/// The input guards stay held while output is locked, so a concurrent call
/// with the roles crossed can deadlock.
pub(crate) fn binary<R>(
    a: &SharedPoly,
    b: &SharedPoly,
    output: &SharedPoly,
    f: impl FnOnce(&PolyRNS<u64>, &PolyRNS<u64>, &mut PolyRNS<u64>) -> R,
) -> R {
    let a: Input = read(a, output);
    let b: Input = read(b, output);
    f(&a, &b, &mut write(output))
}
