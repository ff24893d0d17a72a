//! Exports over the multiparty key-generation protocols.

use crate::abi::{guard, HandleResult, Status, U64Result};
use crate::error::BridgeError;
use crate::registry::{get, insert, ObjectKind, REGISTRY};
use ckks::dckks::{CkgProtocol, CkgShare, RkgProtocol, RtgProtocol};
use ckks::keys::{PublicKey, SecretKey};
use ckks::{Parameters, PolyQP};
use handles::{Handle, Kind};
use sampling::prng::Prng;
use std::sync::Arc;
use tracing::debug;

fn params(handle: u64) -> Result<Arc<Parameters>, BridgeError> {
    get::<Parameters>(handle)
}

fn ckg(handle: u64) -> Result<Arc<CkgProtocol>, BridgeError> {
    get::<CkgProtocol>(handle)
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_ckg_protocol(params_handle: u64) -> HandleResult {
    guard("lattice_new_ckg_protocol", || {
        debug!("new ckg protocol");
        Ok(insert(CkgProtocol::new(&params(params_handle)?)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_ckg_allocate_share(ckg_handle: u64) -> HandleResult {
    guard("lattice_ckg_allocate_share", || Ok(insert(ckg(ckg_handle)?.allocate_share())))
}

/// Samples the common reference polynomial from a PRNG keyed identically by
/// every party.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_ckg_sample_crp(ckg_handle: u64, prng: u64) -> HandleResult {
    guard("lattice_ckg_sample_crp", || {
        Ok(insert(ckg(ckg_handle)?.sample_crp(&get::<Prng>(prng)?)))
    })
}

/// Writes this party's share -s * crp + e into `share`.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_ckg_gen_share(ckg_handle: u64, sk: u64, crp: u64, share: u64) -> Status {
    guard("lattice_ckg_gen_share", || {
        let ckg: Arc<CkgProtocol> = ckg(ckg_handle)?;
        let (sk, crp, share) = (get::<SecretKey>(sk)?, get::<PolyQP>(crp)?, get::<CkgShare>(share)?);
        ckg.params().check_poly_qp(&[&sk.value, &*crp, &share.value])?;
        ckg.gen_share(&sk, &crp, &share);
        Ok(())
    })
}

/// out = share1 + share2; out may name one of the inputs.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_ckg_aggregate_shares(ckg_handle: u64, share1: u64, share2: u64, out: u64) -> Status {
    guard("lattice_ckg_aggregate_shares", || {
        let ckg: Arc<CkgProtocol> = ckg(ckg_handle)?;
        let (share1, share2, out) = (get::<CkgShare>(share1)?, get::<CkgShare>(share2)?, get::<CkgShare>(out)?);
        ckg.params().check_poly_qp(&[&share1.value, &share2.value, &out.value])?;
        ckg.aggregate(&share1, &share2, &out);
        Ok(())
    })
}

/// Writes the collective public key (round_share, crp) into `pk`.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_ckg_gen_public_key(ckg_handle: u64, round_share: u64, crp: u64, pk: u64) -> Status {
    guard("lattice_ckg_gen_public_key", || {
        let ckg: Arc<CkgProtocol> = ckg(ckg_handle)?;
        let (round_share, crp, pk) = (get::<CkgShare>(round_share)?, get::<PolyQP>(crp)?, get::<PublicKey>(pk)?);
        ckg.params().check_poly_qp(&[&round_share.value, &*crp, &pk.value[0], &pk.value[1]])?;
        ckg.gen_public_key(&round_share, &crp, &pk);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_public_key(params_handle: u64) -> HandleResult {
    guard("lattice_new_public_key", || Ok(insert(PublicKey::new(&params(params_handle)?))))
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_rkg_protocol(params_handle: u64) -> HandleResult {
    guard("lattice_new_rkg_protocol", || {
        debug!("new rkg protocol");
        Ok(insert(RkgProtocol::new(&params(params_handle)?)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn lattice_new_rot_kg_protocol(params_handle: u64) -> HandleResult {
    guard("lattice_new_rot_kg_protocol", || {
        debug!("new rtg protocol");
        Ok(insert(RtgProtocol::new(&params(params_handle)?)))
    })
}

/// Returns the gadget decomposition count of an RKG or RTG protocol.
#[unsafe(no_mangle)]
pub extern "C" fn lattice_protocol_beta(protocol: u64) -> U64Result {
    guard("lattice_protocol_beta", || {
        let beta: usize = match REGISTRY.kind(Handle::from_raw(protocol))? {
            ObjectKind::RtgProtocol => get::<RtgProtocol>(protocol)?.beta(),
            ObjectKind::RkgProtocol => get::<RkgProtocol>(protocol)?.beta(),
            kind => {
                return Err(BridgeError::from(handles::HandleError::TypeMismatch {
                    handle: Handle::from_raw(protocol),
                    expected: ObjectKind::RkgProtocol.name(),
                    found: kind.name(),
                }));
            }
        };
        Ok(beta as u64)
    })
}
