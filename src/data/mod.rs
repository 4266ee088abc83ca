mod loader;

pub use loader::{LoadError, builtin_catalog, load_catalog, load_quiz_from_str, load_topic_from_str};
