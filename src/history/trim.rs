//! History trimming: bound the transcript while keeping the system prompt.

use tracing::debug;

use super::MessageHistory;

/// Trim `history` so that at most `max_user_turns` user turns remain before
/// the next utterance is appended. The system prompt at position 0 is always
/// kept; `max_user_turns` of 0 disables trimming.
///
/// The retained window is the last `2 * max_user_turns` messages, a shape
/// that assumes one assistant reply per user turn. Turns with tool round
/// trips contribute extra messages, so the window then holds fewer full
/// turns. Histories shorter than the window are left untouched.
pub fn trim(history: &mut MessageHistory, max_user_turns: usize) {
    if max_user_turns == 0 {
        return;
    }
    if history.user_message_count() < max_user_turns {
        return;
    }
    let keep = 2 * max_user_turns;
    let len = history.len();
    if len <= keep + 1 {
        return;
    }

    history.messages_mut().drain(1..len - keep);
    debug!(
        removed = len - keep - 1,
        retained = keep + 1,
        "trimmed conversation history"
    );
}
