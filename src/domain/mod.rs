// Configuration value objects
pub mod config;

// Domain-specific error types
pub mod errors;

// Spot market resolution, ranking and reconciliation
pub mod market;

// Port interfaces
pub mod ports;
