use std::{
    io::{BufRead, BufReader, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    thread,
};

use rts_client_cli::{config::ClientConfig, server};
use serde_json::Value;

#[test]
fn serves_one_session_over_tcp() {
    let config = ClientConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        seed: Some(1),
        max_sessions: Some(1),
        ..ClientConfig::default()
    };
    let listener = server::bind(&config).expect("listener binds");
    let addr = listener.local_addr().expect("listener has an address");
    let handle = thread::spawn(move || server::serve(&listener, &config));

    let mut stream = TcpStream::connect(addr).expect("client connects");
    let mut reader = BufReader::new(stream.try_clone().expect("stream clones"));

    let first = concat!(
        r#"{"game_info":{"map_width":4,"map_height":1},"#,
        r#""tile_updates":[{"x":0,"y":0,"blocked":false},{"x":1,"y":0,"blocked":false},"#,
        r#"{"x":2,"y":0,"blocked":false},{"x":3,"y":0,"blocked":true,"resources":80}],"#,
        r#""unit_updates":[{"id":"w1","type":"worker","x":0,"y":0},"#,
        r#"{"id":"b","type":"base","x":0,"y":0,"resource":0}]}"#,
        "\n"
    );
    stream.write_all(first.as_bytes()).expect("first update sent");

    let mut line = String::new();
    let _ = reader.read_line(&mut line).expect("first batch arrives");
    let batch: Value = serde_json::from_str(&line).expect("batch is json");
    assert_eq!(
        batch,
        serde_json::json!({"commands": [{"command": "MOVE", "unit": "w1", "dir": "E"}]})
    );

    let second = concat!(
        r#"{"tile_updates":[],"unit_updates":["#,
        r#"{"id":"w1","type":"worker","x":2,"y":0,"resource":0}]}"#,
        "\n"
    );
    stream.write_all(second.as_bytes()).expect("second update sent");

    line.clear();
    let _ = reader.read_line(&mut line).expect("second batch arrives");
    let batch: Value = serde_json::from_str(&line).expect("batch is json");
    assert_eq!(
        batch,
        serde_json::json!({"commands": [{"command": "GATHER", "unit": "w1", "dir": "E"}]})
    );

    stream.shutdown(Shutdown::Write).expect("write half closes");
    line.clear();
    assert_eq!(reader.read_line(&mut line).expect("clean eof"), 0);

    handle
        .join()
        .expect("server thread completes")
        .expect("server exits after one session");
}
