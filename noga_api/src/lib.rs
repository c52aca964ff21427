mod client;
mod errors;
mod normalize;
mod range;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::normalize::flatten;
pub use self::range::{DateRange, InvalidRange, API_DATE_FMT};
