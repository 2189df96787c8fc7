pub mod auth;
pub mod pricing_service;
pub mod assembly;
pub mod checkout_service;
pub mod cart_service;
pub mod cliente_service;
pub mod pedido_service;
