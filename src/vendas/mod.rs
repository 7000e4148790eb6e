// src/vendas/mod.rs

// Declara o submódulo que contém as definições das structs de vendas
pub mod venda_structs;
// Declara o submódulo que contém as funções de rota relacionadas a vendas
pub mod venda_router;
