pub mod core {
    pub mod actions;
    pub mod clock;
    pub mod handle_server;
    pub mod race_server;
    pub mod room;
}
pub mod interfaces {
    pub mod messages;
}
pub mod net {
    pub mod transport;
}
pub mod pre {
    pub mod serve_opts;
}
