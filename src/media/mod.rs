pub(crate) mod color;
pub(crate) mod pool;
pub(crate) mod transition;
