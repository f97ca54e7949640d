//! Document acquisition: fetching sitemap documents over the network.

pub mod http_client;
