mod geo_annotator;
mod recursive_resolver;

pub use geo_annotator::{GeoAnnotator, LOCATION_TTL};
pub use recursive_resolver::{RecursiveResolver, ResolverOptions};
