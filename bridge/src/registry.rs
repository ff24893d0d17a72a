use crate::error::BridgeError;
use ckks::bootstrapping::ParametersSet;
use ckks::dckks::{CkgProtocol, CkgShare, RkgProtocol, RtgProtocol};
use ckks::keygen::KeyGenerator;
use ckks::keys::{PublicKey, SecretKey};
use ckks::{Ciphertext, CiphertextQP, MetaData, Parameters, Plaintext, PolyCell, PolyQP, Scale};
use handles::{Handle, Kind, Object, Registry, RegistryConfig};
use math::ring::impl_u64::basis_extension::BasisExtender;
use math::ring::{RingQP, RingRNS};
use math::sampler::UniformSampler;
use parking_lot::RwLock;
use sampling::prng::Prng;
use std::sync::{Arc, LazyLock};

/// Registry shared by every exported function.
pub static REGISTRY: LazyLock<Registry<ObjectKind>> = LazyLock::new(|| Registry::new(RegistryConfig::default()));

/// Kind tag of every object the bridge registers. The discriminants are
/// reported by `lattice_handle_kind` and are part of the ABI.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Prng = 1,
    Ring = 2,
    RingQP = 3,
    Poly = 4,
    PolyQP = 5,
    UniformSampler = 6,
    BasisExtender = 7,
    PermutationIndex = 8,
    BootstrappingParameters = 9,
    Parameters = 10,
    Ciphertext = 11,
    CiphertextQP = 12,
    Plaintext = 13,
    MetaData = 14,
    Scale = 15,
    KeyGenerator = 16,
    SecretKey = 17,
    PublicKey = 18,
    CkgProtocol = 19,
    CkgShare = 20,
    RkgProtocol = 21,
    RtgProtocol = 22,
}

impl Kind for ObjectKind {
    fn name(self) -> &'static str {
        match self {
            ObjectKind::Prng => "Prng",
            ObjectKind::Ring => "Ring",
            ObjectKind::RingQP => "RingQP",
            ObjectKind::Poly => "Poly",
            ObjectKind::PolyQP => "PolyQP",
            ObjectKind::UniformSampler => "UniformSampler",
            ObjectKind::BasisExtender => "BasisExtender",
            ObjectKind::PermutationIndex => "PermutationIndex",
            ObjectKind::BootstrappingParameters => "BootstrappingParameters",
            ObjectKind::Parameters => "Parameters",
            ObjectKind::Ciphertext => "Ciphertext",
            ObjectKind::CiphertextQP => "CiphertextQP",
            ObjectKind::Plaintext => "Plaintext",
            ObjectKind::MetaData => "MetaData",
            ObjectKind::Scale => "Scale",
            ObjectKind::KeyGenerator => "KeyGenerator",
            ObjectKind::SecretKey => "SecretKey",
            ObjectKind::PublicKey => "PublicKey",
            ObjectKind::CkgProtocol => "CkgProtocol",
            ObjectKind::CkgShare => "CkgShare",
            ObjectKind::RkgProtocol => "RkgProtocol",
            ObjectKind::RtgProtocol => "RtgProtocol",
        }
    }
}

/// Indices of an NTT-domain automorphism, as returned by
/// `lattice_permute_ntt_index`.
pub struct PermutationIndex(pub Vec<usize>);

macro_rules! objects {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Object<ObjectKind> for $ty {
                const KIND: ObjectKind = ObjectKind::$kind;
            }
        )*
    };
}

objects! {
    Prng => Prng,
    RingRNS<u64> => Ring,
    RingQP => RingQP,
    PolyCell => Poly,
    PolyQP => PolyQP,
    UniformSampler => UniformSampler,
    BasisExtender => BasisExtender,
    PermutationIndex => PermutationIndex,
    ParametersSet => BootstrappingParameters,
    Parameters => Parameters,
    Ciphertext => Ciphertext,
    CiphertextQP => CiphertextQP,
    Plaintext => Plaintext,
    RwLock<MetaData> => MetaData,
    Scale => Scale,
    KeyGenerator => KeyGenerator,
    SecretKey => SecretKey,
    PublicKey => PublicKey,
    CkgProtocol => CkgProtocol,
    CkgShare => CkgShare,
    RkgProtocol => RkgProtocol,
    RtgProtocol => RtgProtocol,
}

/// Typed lookup of a raw handle in [REGISTRY].
pub(crate) fn get<T: Object<ObjectKind>>(handle: u64) -> Result<Arc<T>, BridgeError> {
    Ok(REGISTRY.get::<T>(Handle::from_raw(handle))?)
}

pub(crate) fn insert<T: Object<ObjectKind>>(value: T) -> Handle {
    REGISTRY.insert(value)
}

/// Registers an object that is already shared, so the new handle aliases it.
pub(crate) fn insert_arc<T: Object<ObjectKind>>(value: Arc<T>) -> Handle {
    REGISTRY.insert_arc(value)
}
