pub mod raster;
pub mod recording;
pub mod surface;
