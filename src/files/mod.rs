pub mod file_structs;
pub mod readers;
pub mod writers;
