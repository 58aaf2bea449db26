pub(crate) mod events;
pub(crate) mod guard;
pub(crate) mod overlay;
pub(crate) mod scroll_lock;
