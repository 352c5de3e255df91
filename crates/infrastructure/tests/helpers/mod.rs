#![allow(dead_code)]
#![allow(unused_imports)]

mod builders;
mod dns_server_mock;

pub use builders::*;
pub use dns_server_mock::*;
