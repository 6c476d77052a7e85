mod context;
mod package;
mod vnf;

pub use context::*;
pub use package::*;
pub use vnf::*;
