pub mod auth;
pub mod checkout;
pub mod carrinho;
pub mod enderecos;
pub mod pedidos;
