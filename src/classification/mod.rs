//! Country and buyer risk classifications

mod buyer;
mod country;
pub mod directory;

pub use buyer::BuyerCategory;
pub use country::CountryCategory;
pub use directory::{CountryDirectory, CountryEntry, CountryInfo};
