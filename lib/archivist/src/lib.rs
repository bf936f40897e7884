pub mod archive;
pub mod corrections;
pub mod error;
pub mod header;
pub mod normalize;
pub mod period;
pub mod publish;
pub mod soundcloud;
pub mod traits;
pub mod transform;

pub use corrections::Corrections;
pub use header::HeaderRenderer;
pub use period::ResolvedPeriod;
pub use transform::{BatchReport, NormalizedDocument, RecordTransformer};
pub use traits::{CatalogSource, PublishOutcome, Publisher};
