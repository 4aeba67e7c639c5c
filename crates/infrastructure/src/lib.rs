//! Concrete adapters: DNS resolution, port/scheme probing, vhost probing
//! (including the SNI name-injection dial hook), progress reporting, and
//! result/log file writing. Everything here implements a port from
//! `vhost_sieve_application::ports`.

pub mod dns;
pub mod http;
pub mod logs;
pub mod output;
pub mod progress;
