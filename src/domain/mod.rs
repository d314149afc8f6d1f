pub mod history;
pub mod record;
pub mod schema;
