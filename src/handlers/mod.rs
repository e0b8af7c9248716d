// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (Basic auth + role policy)
pub mod protected;
pub mod public;
