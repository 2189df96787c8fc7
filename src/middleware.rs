pub mod auth;
pub mod tenancy;
pub mod perfil;
