// src/dashboard/mod.rs

// Declara o submódulo que contém as definições das structs do dashboard
pub mod dashboard_structs;
// Declara o submódulo com as funções puras de agregação e métricas
pub mod metricas;
// Declara o submódulo que contém a rota do resumo financeiro
pub mod dashboard_router;
