pub mod allocator;
pub mod resolver;

pub use allocator::{MaxPlusOne, NodeIdAllocator};
pub use resolver::PassResolver;
