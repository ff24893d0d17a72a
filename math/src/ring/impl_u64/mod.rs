pub mod automorphism;
pub mod basis_extension;
pub mod ring;
pub mod ring_qp;
pub mod ring_rns;
pub mod sampling;
