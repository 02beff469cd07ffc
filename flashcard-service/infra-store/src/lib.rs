pub mod card_sets;
pub mod database;
pub mod error;
mod schema;

pub use card_sets::SqliteCardSetRepository;
pub use database::Database;
pub use error::StoreError;
