//! Menu Adapter - 通过后端 API 读写菜单

mod http_menu_repository;

pub use http_menu_repository::HttpMenuRepository;
