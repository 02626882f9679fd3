use logmsg_macro::logger_message;

#[logger_message("Started", LogLevel::Information, "Listening on {Port:u16}")]
#[logger_message(
    name = "Stopped",
    log_level = LogLevel::Warning,
    format = "Stopped after {Seconds:u64}s",
    event_id = 12,
    extension_scope = Scope::Interface,
)]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Server {
    port: u16,
}

#[logger_message("Tick", LogLevel::Trace, "Tick {Count:usize}")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clock {
    Running,
}

#[test]
fn leaves_items_untouched() {
    assert_eq!(Server::default(), Server { port: 0 });
    assert_eq!(Clock::Running, Clock::Running);
}
