/// Append-only log of recorded sessions.
pub mod history_store;
/// History log persisted as a JSON document on local disk.
pub mod json_file;
/// In-process store implementations.
pub mod memory;
/// Database model definitions.
pub mod models;
/// Player roster persistence.
pub mod roster_store;
/// Current session persistence.
pub mod session_store;
/// Storage abstraction layer for database operations.
pub mod storage;
