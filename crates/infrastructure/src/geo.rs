mod loader;

pub use loader::GeoTableLoader;
