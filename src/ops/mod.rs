pub mod backup;
pub mod export;
pub mod lookup;
pub mod prune;
pub mod reduce;

pub use backup::*;
pub use export::*;
pub use lookup::*;
pub use prune::*;
pub use reduce::*;
