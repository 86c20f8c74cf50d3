//! End-to-end scenarios over a real list directory.

use std::sync::Arc;

use whitelist::router::response::{CONTEXT_REQUIRED, PERMISSION_DENIED};
use whitelist::router::structured::{OptionValue, REMOVE_CHANNEL, REMOVE_SELECT};
use whitelist::{CommandContext, InboundMessage, SlashCommand};
use whitelist_testkit::fixtures::{
    admin_context, admin_host, admin_message, id, key, member_context, TestFixture, CHANNEL,
};

#[tokio::test]
async fn added_member_survives_reload() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);

    service
        .handle_message(&admin_message(".whitelist add mods 111"))
        .await
        .unwrap();
    assert!(service.object_ok("mods", 111));
    assert_eq!(fixture.read_list("mods"), Some(vec![111]));

    drop(service);
    let reopened = fixture.open_store();
    assert!(reopened.query("mods", id(111)));
}

#[tokio::test]
async fn removed_member_is_not_allowed() {
    let fixture = TestFixture::with_files(&[("mods.txt", "111\n222\n")]);
    let service = fixture.open_service(admin_host().await);

    let reply = service
        .handle_message(&admin_message(".whitelist remove mods 111"))
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("Removed 111 from mods"));
    assert!(!service.object_ok("mods", 111));
    assert!(service.object_ok("mods", 222));
    assert_eq!(fixture.read_list("mods"), Some(vec![222]));
}

#[tokio::test]
async fn removing_last_member_deletes_key_and_file() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);

    service
        .handle_message(&admin_message(".whitelist add mods 5"))
        .await
        .unwrap();
    assert!(fixture.file_exists("mods"));

    service
        .handle_message(&admin_message(".whitelist remove mods 5"))
        .await
        .unwrap();
    assert!(!service.store().list_keys().contains(&key("mods")));
    assert!(!fixture.file_exists("mods"));
    assert!(fixture.entries().is_empty());
}

#[tokio::test]
async fn unknown_key_allows_nothing() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);

    assert!(!service.object_ok("never-added", 1));
    assert!(!service.access().object_ok("never-added", u64::MAX));
}

#[tokio::test]
async fn repeated_add_is_idempotent() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);

    for _ in 0..2 {
        let reply = service
            .handle_message(&admin_message(".whitelist add mods 7"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("Added 7 to mods"));
    }
    assert_eq!(service.store().list_members("mods"), vec![id(7)]);
    assert_eq!(fixture.read_list("mods"), Some(vec![7]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_are_not_lost() {
    let fixture = TestFixture::new();
    let service = Arc::new(fixture.open_service(admin_host().await));

    let handles: Vec<_> = (0..16u64)
        .map(|n| {
            let service = service.clone();
            tokio::spawn(async move {
                let message = admin_message(&format!(".whitelist add mods {}", n));
                service.handle_message(&message).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let expected: Vec<u64> = (0..16).collect();
    for n in &expected {
        assert!(service.object_ok("mods", *n));
    }
    assert_eq!(fixture.read_list("mods"), Some(expected));
}

#[tokio::test]
async fn malformed_legacy_command_replies_usage() {
    let fixture = TestFixture::new();
    let host = admin_host().await;
    let service = fixture.open_service(host.clone());

    let reply = service
        .handle_message(&admin_message(".whitelist add onlykey"))
        .await
        .unwrap();
    assert_eq!(
        reply.as_deref(),
        Some("Error processing command, usage: .whitelist [add|remove] [key] [all|objectID]")
    );
    assert!(service.store().is_empty());
    assert!(fixture.entries().is_empty());
    assert_eq!(host.replies().await.len(), 1);
}

#[tokio::test]
async fn unparseable_persisted_lines_are_skipped() {
    let fixture = TestFixture::with_files(&[("mods.txt", "111\n222\nnotanumber\n333\n")]);
    let service = fixture.open_service(admin_host().await);

    assert_eq!(
        service.store().list_members("mods"),
        vec![id(111), id(222), id(333)]
    );
}

#[tokio::test]
async fn remove_all_of_missing_key_changes_nothing() {
    let fixture = TestFixture::with_files(&[("mods.txt", "1\n")]);
    let service = fixture.open_service(admin_host().await);
    let before = fixture.entries();

    let reply = service
        .handle_message(&admin_message(".whitelist remove ghost all"))
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("Removed key ghost"));
    assert_eq!(fixture.entries(), before);
    assert_eq!(fixture.read_list("mods"), Some(vec![1]));
}

#[tokio::test]
async fn unprivileged_and_unscoped_callers_are_refused() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);

    let denied = InboundMessage {
        context: member_context(),
        content: ".whitelist add mods 1".to_string(),
    };
    assert_eq!(
        service.handle_message(&denied).await.unwrap().as_deref(),
        Some(PERMISSION_DENIED)
    );

    let unscoped = CommandContext::unscoped(admin_context().caller, CHANNEL);
    let reply = service
        .handle_command(&unscoped, &SlashCommand::new("whitelist", "list"))
        .await
        .unwrap();
    assert_eq!(reply, CONTEXT_REQUIRED);

    assert!(service.store().is_empty());
    assert!(fixture.entries().is_empty());
}

#[tokio::test]
async fn both_front_ends_share_one_store() {
    let fixture = TestFixture::new();
    let service = fixture.open_service(admin_host().await);
    let context = admin_context();

    service
        .handle_message(&admin_message(".whitelist add mods 42"))
        .await
        .unwrap();

    let listing = service
        .handle_command(
            &context,
            &service
                .router()
                .structured()
                .from_text("/whitelist list mods")
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listing, "42 (<#42>)");

    let remove = SlashCommand::new("whitelist", "remove")
        .with_option(REMOVE_SELECT, OptionValue::String("mods".into()))
        .with_option(REMOVE_CHANNEL, OptionValue::Channel(42));
    assert_eq!(
        service.handle_command(&context, &remove).await.unwrap(),
        "Removed <#42> from whitelist `mods`"
    );
    assert!(!fixture.file_exists("mods"));
}

#[tokio::test]
async fn empty_list_files_are_pruned_on_open() {
    let fixture = TestFixture::with_files(&[("empty.txt", "notanumber\n"), ("mods.txt", "9\n")]);
    let service = fixture.open_service(admin_host().await);

    assert_eq!(service.store().list_keys(), vec![key("mods")]);
    assert!(!fixture.file_exists("empty"));
}
