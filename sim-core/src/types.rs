/// Identifier for a particle in a [`crate::store::ParticleStore`].
///
/// This is an index into `ParticleStore::particles`, and is only meaningful
/// within the lifetime of a given `ParticleStore` instance.
pub type ParticleId = usize;
