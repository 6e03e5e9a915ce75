mod client;
mod collection;
mod filter;
mod pager;

pub use self::client::{FeatureService, GetFeatureRequest, WfsClient};
pub use self::collection::FeatureCollection;
pub use self::filter::PropertyIsLike;
pub use self::pager::{FeaturePager, ModeConflictError, BOREHOLE_VIEW_TYPE, PAGE_SIZE};
