pub mod common;

mod send_flow;
