// src/shared/mod.rs

// Declara o submódulo com as structs compartilhadas entre os demais módulos
pub mod shared_structs;
