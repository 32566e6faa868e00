//! Asset registry port trait.

pub trait AssetRegistry {
    /// Whether `code` names a tradable instrument.
    fn resolve(&self, code: &str) -> bool;
}
