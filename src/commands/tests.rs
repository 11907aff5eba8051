use super::*;
use crate::core::persona::AppMode;
use crate::utils::test_utils::create_test_app;
use std::fs;
use tempfile::TempDir;

fn output_of(result: CommandResult) -> String {
    match result {
        CommandResult::Output(text) => text,
        other => panic!("expected output, got {other:?}"),
    }
}

#[test]
fn plain_text_is_processed_as_message() {
    let mut test = create_test_app();
    assert_eq!(
        process_input(&mut test.app, "hello /there"),
        CommandResult::ProcessAsMessage("hello /there".into())
    );
    assert_eq!(
        process_input(&mut test.app, "/"),
        CommandResult::ProcessAsMessage("/".into())
    );
}

#[test]
fn unknown_commands_are_reported_not_sent() {
    let mut test = create_test_app();
    let text = output_of(process_input(&mut test.app, "/frobnicate now"));
    assert!(text.contains("/frobnicate"));
}

#[test]
fn help_lists_every_command() {
    let mut test = create_test_app();
    let text = output_of(process_input(&mut test.app, "/HELP"));
    for command in all_commands() {
        assert!(text.contains(command.usage), "missing {}", command.usage);
    }
}

#[test]
fn matching_commands_filters_by_prefix() {
    let names: Vec<&str> = matching_commands("/de")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["delete", "detach"]);
}

#[test]
fn new_select_and_rename_sessions() {
    let mut test = create_test_app();
    process_input(&mut test.app, "/new");
    process_input(&mut test.app, "/new");
    assert_eq!(test.app.registry().len(), 2);

    let older = test.app.registry().sessions()[1].id.clone();
    process_input(&mut test.app, "/select 2");
    assert_eq!(test.app.registry().current_id(), Some(older.as_str()));

    let text = output_of(process_input(&mut test.app, "/rename   Trip plans "));
    assert!(text.contains("Trip plans"));
    assert_eq!(
        test.app.registry().current().map(|s| s.title.as_str()),
        Some("Trip plans")
    );
    assert!(test.app.registry().current().is_some_and(|s| s.is_custom_title));

    let text = output_of(process_input(&mut test.app, "/select nope"));
    assert!(text.contains("No session matches"));
}

#[test]
fn delete_waits_for_confirmation() {
    let mut test = create_test_app();
    process_input(&mut test.app, "/new");

    let text = output_of(process_input(&mut test.app, "/delete"));
    assert!(text.contains("/confirm"));
    assert_eq!(test.app.registry().len(), 1);

    output_of(process_input(&mut test.app, "/cancel"));
    assert_eq!(test.app.registry().len(), 1);
    assert_eq!(
        output_of(process_input(&mut test.app, "/confirm")),
        "Nothing to confirm."
    );

    process_input(&mut test.app, "/delete 1");
    output_of(process_input(&mut test.app, "/confirm"));
    assert!(test.app.registry().is_empty());
    assert_eq!(test.app.mode(), AppMode::Home);
}

#[test]
fn mode_commands_switch_views() {
    let mut test = create_test_app();
    let text = output_of(process_input(&mut test.app, "/chat"));
    assert!(text.contains("/new"));
    assert_eq!(test.app.mode(), AppMode::Home);

    process_input(&mut test.app, "/chair");
    assert_eq!(test.app.mode(), AppMode::Chair);

    process_input(&mut test.app, "/new");
    process_input(&mut test.app, "/home");
    assert_eq!(test.app.mode(), AppMode::Home);
    process_input(&mut test.app, "/chat");
    assert_eq!(test.app.mode(), AppMode::Chat);
}

#[test]
fn toggles_persist_and_report_persona() {
    let mut test = create_test_app();
    let text = output_of(process_input(&mut test.app, "/auto"));
    assert_eq!(text, "Auto-Mode: on (persona: auto)");
    let text = output_of(process_input(&mut test.app, "/memes"));
    assert!(text.starts_with("Memes: off"));

    let stored: crate::core::settings::Settings = test
        .store()
        .load(crate::core::store::StoreKey::Settings)
        .expect("settings saved");
    assert!(stored.auto_mode);
    assert!(!stored.memes_enabled);
}

#[test]
fn language_and_base_url_commands() {
    let mut test = create_test_app();
    output_of(process_input(&mut test.app, "/lang ru"));
    assert_eq!(test.app.settings().language, Language::Ru);
    let text = output_of(process_input(&mut test.app, "/lang xx"));
    assert!(text.contains("Unknown language"));

    process_input(&mut test.app, "/baseurl https://proxy.example");
    assert_eq!(
        test.app.settings().base_url_override(),
        Some("https://proxy.example")
    );
    process_input(&mut test.app, "/baseurl");
    assert_eq!(test.app.settings().base_url_override(), None);
}

#[test]
fn attach_and_detach_files() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("notes.csv");
    fs::write(&path, "a,b").expect("write");

    let mut test = create_test_app();
    let text = output_of(process_input(
        &mut test.app,
        &format!("/attach {}", path.display()),
    ));
    assert!(text.contains("notes.csv"));
    assert_eq!(
        test.app.compose_attachment().map(|a| a.mime_type.as_str()),
        Some("text/csv")
    );

    assert_eq!(
        output_of(process_input(&mut test.app, "/detach")),
        "Removed notes.csv."
    );
    assert!(test.app.compose_attachment().is_none());

    let text = output_of(process_input(&mut test.app, "/attach /definitely/missing.png"));
    assert!(text.starts_with("Could not read"));
}

#[test]
fn quit_stops_the_loop() {
    let mut test = create_test_app();
    assert_eq!(process_input(&mut test.app, "/quit"), CommandResult::Quit);
}
