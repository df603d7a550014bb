pub mod pages;
pub mod routes_admin;
pub mod routes_send;
pub mod server;
