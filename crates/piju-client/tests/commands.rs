mod common;

use common::mock_server::{dead_host, http_client, MockServer};
use piju_client::{CommandSender, ResumeSource};

#[tokio::test]
async fn simple_commands_post_to_player_paths() {
    let server = MockServer::start().await;
    let sender = CommandSender::new(server.host(), http_client());

    sender.pause().await;
    sender.resume().await;
    sender.next().await;
    sender.previous().await;

    let paths: Vec<String> = server
        .state
        .commands()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    assert_eq!(
        paths,
        ["player/pause", "player/resume", "player/next", "player/previous"]
    );
}

#[tokio::test]
async fn resume_from_sends_player_body() {
    let server = MockServer::start().await;
    let sender = CommandSender::new(server.host(), http_client());

    sender.resume_from(ResumeSource::Radio).await;
    sender.resume_from(ResumeSource::Local).await;

    let commands = server.state.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].0, "player/resume");
    let body: serde_json::Value = serde_json::from_str(&commands[0].1).unwrap();
    assert_eq!(body, serde_json::json!({ "player": "radio" }));
    let body: serde_json::Value = serde_json::from_str(&commands[1].1).unwrap();
    assert_eq!(body["player"], "local");
}

#[tokio::test]
async fn commands_to_dead_server_are_absorbed() {
    let sender = CommandSender::new(dead_host().await, http_client());
    sender.pause().await;
    sender.resume_from(ResumeSource::Local).await;
}
