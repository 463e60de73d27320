pub mod snapshot;

pub use snapshot::JsonSnapshotStore;

use crate::error::Error;
use crate::model::Snapshot;

/// Persistence for the per-item counter baseline.
///
/// `save` replaces whatever was stored before; entries absent from the new
/// snapshot are gone afterwards.
pub trait SnapshotStore {
    /// An empty map means there is no baseline yet.
    fn load(&self) -> Result<Snapshot, Error>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), Error>;
}
