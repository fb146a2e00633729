/// Database connection and table creation
pub mod database;

/// Sample data seeding from a TOML file
pub mod seed;

/// Runtime settings loaded from the environment
pub mod settings;
