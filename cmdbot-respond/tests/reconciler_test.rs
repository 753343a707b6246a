//! Integration tests for [`cmdbot_respond::Responder`].
//!
//! Covers: fresh sends of split chunks, edit convergence when the new answer
//! has fewer or more chunks than the sent unit, stale-unit deletion on
//! finalize, reply-kind degradation in private contexts, the
//! no-send-permission degrade to direct messages, and code-fence formatting.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use cmdbot_core::{
    ChannelId, ChatClient, Destination, GuildId, MessageHandle, ResponseKind, SplitPolicy,
    Trigger, User,
};
use cmdbot_respond::{Responder, ResponseState};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Send { destination: Destination, text: String, id: String },
    Edit { id: String, text: String },
    Delete { id: String },
}

/// Records every platform call; ids are handed out sequentially (m0, m1, ...).
struct MockChat {
    ops: Mutex<Vec<Op>>,
    next_id: AtomicUsize,
    can_send: AtomicBool,
}

impl MockChat {
    fn new() -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
            can_send: AtomicBool::new(true),
        }
    }

    fn deny_send(&self) {
        self.can_send.store(false, Ordering::SeqCst);
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn send(&self, destination: &Destination, text: &str) -> cmdbot_core::Result<MessageHandle> {
        let id = format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.ops.lock().unwrap().push(Op::Send {
            destination: destination.clone(),
            text: text.to_string(),
            id: id.clone(),
        });
        Ok(MessageHandle {
            destination: destination.clone(),
            id,
        })
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> cmdbot_core::Result<MessageHandle> {
        self.ops.lock().unwrap().push(Op::Edit {
            id: handle.id.clone(),
            text: text.to_string(),
        });
        Ok(handle.clone())
    }

    async fn delete(&self, handle: &MessageHandle) -> cmdbot_core::Result<()> {
        self.ops.lock().unwrap().push(Op::Delete {
            id: handle.id.clone(),
        });
        Ok(())
    }

    async fn has_send_permission(&self, _channel: &ChannelId) -> bool {
        self.can_send.load(Ordering::SeqCst)
    }
}

fn guild_trigger() -> Trigger {
    Trigger {
        channel: ChannelId(10),
        guild: Some(GuildId(1)),
        author: User {
            id: 7,
            username: Some("invoker".to_string()),
            display_name: None,
        },
        content: "!do things".to_string(),
        created_at: Utc::now(),
    }
}

fn private_trigger() -> Trigger {
    Trigger {
        guild: None,
        ..guild_trigger()
    }
}

fn three_char_policy() -> SplitPolicy {
    SplitPolicy {
        max_length: 3,
        ..SplitPolicy::default()
    }
}

/// **Test: A fresh response of N chunks performs exactly N sends and records one unit of N handles.**
///
/// **Setup:** Empty state; content that splits into three chunks.
/// **Action:** `respond(Plain, "aaa\nbbb\nccc", max_length 3)`.
/// **Expected:** Three Send ops to the originating channel; one sent unit of three handles.
#[tokio::test]
async fn test_fresh_send_one_message_per_chunk() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();
    let mut responder = Responder::new(&chat, &trigger, &mut state);

    let handles = responder
        .respond(ResponseKind::Plain, "aaa\nbbb\nccc", Some(three_char_policy()))
        .await
        .unwrap();

    assert_eq!(handles.len(), 3);
    let ops = chat.ops();
    assert_eq!(ops.len(), 3);
    for (op, text) in ops.iter().zip(["aaa", "bbb", "ccc"]) {
        match op {
            Op::Send { destination, text: sent, .. } => {
                assert_eq!(*destination, Destination::Channel(ChannelId(10)));
                assert_eq!(sent, text);
            }
            other => panic!("expected send, got {:?}", other),
        }
    }
    assert_eq!(state.units().len(), 1);
    assert_eq!(state.units()[0].len(), 3);
}

/// **Test: Re-responding with fewer chunks edits the anchor and deletes the surplus from the end.**
///
/// **Setup:** A finalized run that sent one unit of three handles (m0..m2).
/// **Action:** New run responds with one chunk.
/// **Expected:** Edit(m0), then Delete(m2), then Delete(m1); exactly one handle remains; index 0 never deleted.
#[tokio::test]
async fn test_shrink_edits_anchor_and_deletes_tail_backward() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder
        .respond(ResponseKind::Plain, "aaa\nbbb\nccc", Some(three_char_policy()))
        .await
        .unwrap();
    responder.finalize().await.unwrap();
    chat.clear_ops();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    let handles = responder
        .respond(ResponseKind::Plain, "xyz", Some(three_char_policy()))
        .await
        .unwrap();

    assert_eq!(
        chat.ops(),
        vec![
            Op::Edit { id: "m0".to_string(), text: "xyz".to_string() },
            Op::Delete { id: "m2".to_string() },
            Op::Delete { id: "m1".to_string() },
        ]
    );
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].id, "m0");
    assert_eq!(state.units()[0].len(), 1);
}

/// **Test: Re-responding with more chunks edits existing handles then sends the extras.**
///
/// **Setup:** A finalized run that sent one unit of one handle (m0).
/// **Action:** New run responds with two chunks.
/// **Expected:** Edit(m0) then Send, in that order; the new send targets m0's destination; two handles remain.
#[tokio::test]
async fn test_grow_edits_then_creates() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder
        .respond(ResponseKind::Plain, "aaa", Some(three_char_policy()))
        .await
        .unwrap();
    responder.finalize().await.unwrap();
    chat.clear_ops();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    let handles = responder
        .respond(ResponseKind::Plain, "ddd\neee", Some(three_char_policy()))
        .await
        .unwrap();

    let ops = chat.ops();
    assert_eq!(ops.len(), 2);
    assert_eq!(
        ops[0],
        Op::Edit { id: "m0".to_string(), text: "ddd".to_string() }
    );
    match &ops[1] {
        Op::Send { destination, text, .. } => {
            assert_eq!(*destination, Destination::Channel(ChannelId(10)));
            assert_eq!(text, "eee");
        }
        other => panic!("expected send, got {:?}", other),
    }
    assert_eq!(handles.len(), 2);
    assert_eq!(state.units()[0].len(), 2);
}

/// **Test: Finalize deletes every handle inside sent units the new run did not reach.**
///
/// **Setup:** First run produced two sent units, the second split across two
/// messages (m1, m2); second run responds only once.
/// **Action:** `finalize()` after the second run's single respond.
/// **Expected:** Both handles of the stale second unit are deleted; the
/// surviving handle is the first unit's; the cursor is at rest.
#[tokio::test]
async fn test_finalize_deletes_stale_units() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder.respond(ResponseKind::Plain, "one", None).await.unwrap();
    responder
        .respond(ResponseKind::Plain, "bbb\nccc", Some(three_char_policy()))
        .await
        .unwrap();
    responder.finalize().await.unwrap();
    assert_eq!(state.units().len(), 2);
    assert_eq!(state.units()[1].len(), 2);
    chat.clear_ops();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder.respond(ResponseKind::Plain, "uno", None).await.unwrap();
    let survivors = responder.finalize().await.unwrap();

    let ops = chat.ops();
    assert_eq!(ops[0], Op::Edit { id: "m0".to_string(), text: "uno".to_string() });
    assert!(ops[1..].contains(&Op::Delete { id: "m1".to_string() }));
    assert!(ops[1..].contains(&Op::Delete { id: "m2".to_string() }));
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].id, "m0");
    assert_eq!(state.units().len(), 1);
    assert_eq!(state.cursor(), None);
}

/// **Test: A run that produces no output finalizes to an empty state, deleting everything carried over.**
///
/// **Setup:** First run sent one message and finalized.
/// **Action:** Second run calls `finalize()` without responding.
/// **Expected:** The carried-over handle is deleted; no units remain.
#[tokio::test]
async fn test_finalize_without_output_deletes_all() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder.respond(ResponseKind::Plain, "hello", None).await.unwrap();
    responder.finalize().await.unwrap();
    chat.clear_ops();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    let survivors = responder.finalize().await.unwrap();

    assert_eq!(chat.ops(), vec![Op::Delete { id: "m0".to_string() }]);
    assert!(survivors.is_empty());
    assert!(state.units().is_empty());
}

/// **Test: Reply kind in a guild prefixes the author mention.**
#[tokio::test]
async fn test_reply_in_guild_mentions_author() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();
    let mut responder = Responder::new(&chat, &trigger, &mut state);

    responder.reply("done").await.unwrap();

    match &chat.ops()[0] {
        Op::Send { text, .. } => assert_eq!(text, "<@7>, done"),
        other => panic!("expected send, got {:?}", other),
    }
}

/// **Test: Reply kind in a private context degrades to plain (no mention prefix).**
#[tokio::test]
async fn test_reply_in_private_degrades_to_plain() {
    let chat = MockChat::new();
    let trigger = private_trigger();
    let mut state = ResponseState::new();
    let mut responder = Responder::new(&chat, &trigger, &mut state);

    responder.reply("done").await.unwrap();

    match &chat.ops()[0] {
        Op::Send { destination, text, .. } => {
            assert_eq!(*destination, Destination::Channel(ChannelId(10)));
            assert_eq!(text, "done");
        }
        other => panic!("expected send, got {:?}", other),
    }
}

/// **Test: Without send permission in the channel, non-direct kinds degrade to the author's DMs.**
#[tokio::test]
async fn test_no_permission_degrades_to_direct() {
    let chat = MockChat::new();
    chat.deny_send();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();
    let mut responder = Responder::new(&chat, &trigger, &mut state);

    responder.reply("psst").await.unwrap();

    match &chat.ops()[0] {
        Op::Send { destination, text, .. } => {
            assert_eq!(*destination, Destination::Direct(7));
            // Mention dropped along with the channel.
            assert_eq!(text, "psst");
        }
        other => panic!("expected send, got {:?}", other),
    }
}

/// **Test: Code kind escapes fences and wraps content in a fenced block.**
#[tokio::test]
async fn test_code_kind_wraps_and_escapes() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();
    let mut responder = Responder::new(&chat, &trigger, &mut state);

    responder.code("rs", "let s = \"```\";").await.unwrap();

    match &chat.ops()[0] {
        Op::Send { text, .. } => {
            assert!(text.starts_with("```rs\n"));
            assert!(text.ends_with("\n```"));
            assert!(text.contains('\u{200b}'));
        }
        other => panic!("expected send, got {:?}", other),
    }
}

/// **Test: Editing an invocation that keeps responding past its previous run appends fresh units.**
///
/// **Setup:** First run responded once; second run responds twice.
/// **Action:** Second respond call of the second run.
/// **Expected:** Slot 0 is edited, slot 1 is a fresh send appended to the state.
#[tokio::test]
async fn test_rerun_outpacing_previous_run_sends_fresh() {
    let chat = MockChat::new();
    let trigger = guild_trigger();
    let mut state = ResponseState::new();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder.respond(ResponseKind::Plain, "first", None).await.unwrap();
    responder.finalize().await.unwrap();
    chat.clear_ops();

    let mut responder = Responder::new(&chat, &trigger, &mut state);
    responder.respond(ResponseKind::Plain, "first!", None).await.unwrap();
    responder.respond(ResponseKind::Plain, "second", None).await.unwrap();

    let ops = chat.ops();
    assert_eq!(ops[0], Op::Edit { id: "m0".to_string(), text: "first!".to_string() });
    assert!(matches!(&ops[1], Op::Send { text, .. } if text == "second"));
    assert_eq!(state.units().len(), 2);
}
