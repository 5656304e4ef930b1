pub(crate) mod db_restore;

pub use db_restore::{recreate_database, restore_dump};
