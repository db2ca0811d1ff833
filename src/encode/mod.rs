pub(crate) mod ffmpeg;
pub(crate) mod scratch;
pub(crate) mod sink;
