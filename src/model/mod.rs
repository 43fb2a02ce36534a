pub mod month;
pub mod percent;
pub mod perspective;
pub mod record;

pub use month::MonthKey;
pub use percent::Percent;
pub use perspective::{Perspective, UnitColumn};
pub use record::Record;
