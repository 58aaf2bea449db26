pub(crate) mod ease;
pub(crate) mod scramble;
pub(crate) mod timeline;
pub(crate) mod tween;
