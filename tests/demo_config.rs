//! The shipped demo configuration must load and behave as documented.

use std::path::Path;

use playlist_interceptor::config::load_config;
use playlist_interceptor::dispatch::{Dispatcher, InterceptionDecision};

#[test]
fn test_demo_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/interceptor.toml");
    let config = load_config(&path).expect("demo config should be valid");
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    assert_eq!(dispatcher.registry().len(), 2);

    match dispatcher.handle("uhttps://cdn.example.com/master.m3u8", "uhttps") {
        InterceptionDecision::ServeInline(content) => {
            assert!(content.starts_with(b"#EXTM3U"));
        }
        other => panic!("unexpected decision: {other:?}"),
    }

    assert_eq!(
        dispatcher.handle("uhttps://cdn.example.com/360p.m3u8", "uhttps"),
        InterceptionDecision::Redirect("https://cdn.example.com/360p.m3u8".to_string())
    );
}
