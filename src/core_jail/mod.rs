pub mod jail;

pub use jail::PathJail;
