pub mod enums;
pub mod patient;
pub mod preference;
pub mod scan;

pub use enums::*;
pub use patient::*;
pub use preference::*;
pub use scan::*;
