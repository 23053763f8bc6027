mod local;

pub use local::LocalMediaStorage;
