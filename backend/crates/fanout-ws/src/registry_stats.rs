use serde::Serialize;

/// Snapshot of registry size, published by the dispatch loop after each event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub groups: usize,
    pub members: usize,
}
