// src/gastos/mod.rs

// Declara o submódulo que contém as definições das structs de gastos
pub mod gasto_structs;
// Declara o submódulo que contém as funções de rota relacionadas a gastos
pub mod gasto_router;
