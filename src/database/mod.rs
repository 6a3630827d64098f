pub mod bootstrap;
pub mod pool;
