pub(crate) mod mux;
pub(crate) mod probe;
pub(crate) mod source;
