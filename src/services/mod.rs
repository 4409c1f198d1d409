// src/services/mod.rs
//
// Shared services used by more than one domain module

pub mod credentials;

pub use credentials::CredentialService;
