pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cliente;
pub mod pedido;
pub mod tenancy;
