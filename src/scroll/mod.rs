pub(crate) mod choreography;
pub(crate) mod document;
pub(crate) mod engine;
pub(crate) mod reveal;
pub(crate) mod section;
pub(crate) mod surface;
