pub mod domain {
    pub mod error;
    pub mod repository;
    pub mod user;
}

pub mod application {
    pub mod user_service;
}

pub mod data {
    pub mod user_repository;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
    pub mod security;
}

pub mod presentation {
    pub mod envelope;
    pub mod error;
    pub mod handlers;
    pub mod middleware;
    pub mod routes;
}
