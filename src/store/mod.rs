pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteHitStore;
pub use traits::{HitOutcome, TierHitStore};
