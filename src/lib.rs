// AgroConnect: marketplace que liga agricultores, consumidores,
// fornecedores e especialistas. O núcleo do cliente (agregação de catálogo,
// normalização e carrinho) vive na biblioteca; o binário serve os arquivos
// estáticos e a listagem pública de produtos.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
