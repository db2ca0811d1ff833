pub(crate) mod coordinator;
pub(crate) mod layers;
pub(crate) mod render;
