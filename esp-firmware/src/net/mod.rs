// Netzwerk-Modul: DNS-Auflösung und HTTP-Client für den Task-Service

pub mod dns;
pub mod http_client;

pub use dns::{is_network_ready, resolve_ipv4, wait_for_network};
pub use http_client::HttpTaskService;
