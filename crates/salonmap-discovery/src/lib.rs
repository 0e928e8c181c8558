//! Map-screen discovery flow: location, salon load, search, and map/list
//! selection sync, wired together per screen.

pub mod map_sync;
pub mod session;
pub mod surface;

pub use map_sync::{MapSyncController, SyncState, ViewableItem, VIEWABILITY_THRESHOLD};
pub use session::{DiscoveryError, DiscoverySession, LoadSummary, RefreshOutcome};
pub use surface::{SurfaceCommand, SurfaceError, SurfaceEvent};
