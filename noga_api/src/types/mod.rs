mod record;
pub use self::record::FlatRecord;

mod response;
pub use self::response::{DayEntry, ResponseShape};
