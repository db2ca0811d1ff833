pub(crate) mod rasterize;
pub(crate) mod wrap;
