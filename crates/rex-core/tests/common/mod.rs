pub mod flaky_server;
