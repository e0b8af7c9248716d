// handlers/protected/mod.rs - Protected handlers (HTTP Basic authentication required)
//
// Security Level: Basic authentication + role check from the access policy
// Route Prefix: /api/*
// Middleware: basic_auth_middleware

pub mod employees;
