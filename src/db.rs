pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod cart_repo;
pub use cart_repo::CartRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod pedido_repo;
pub use pedido_repo::PedidoRepository;
