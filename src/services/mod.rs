pub mod collision_service;
pub mod directory_service;
pub mod file_service;
pub mod parse_service;
pub mod search_service;
pub mod traverse_service;
