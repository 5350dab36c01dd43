//! Session Progression Controller.
//!
//! Drives one session through `ACTIVE → ACTIVE | COMPLETED` per button
//! tap. The completed-flag check on load is the sole guard against
//! replayed or out-of-order taps; once a session is terminal every further
//! tap gets a transient notice and mutates nothing.

use sprint_core::{
  engine,
  session::Attempt,
  store::PracticeStore,
  transport::ChatTransport,
};
use uuid::Uuid;

use crate::{error::Error, render, TapEvent};

/// Handle a quiz answer tap (`sp|<session-id>|<option-index>`).
pub async fn handle_answer<S, T>(
  store: &S,
  transport: &T,
  tap: &TapEvent,
  session_id: Uuid,
  option_index: usize,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  // Missing, completed, or stale sessions all expire the tap.
  let session = match store.get_session(session_id).await.map_err(Error::store)? {
    Some(session) if !session.completed => session,
    _ => {
      transport
        .ack_event(tap.event_id.clone(), Some(render::SESSION_EXPIRED.into()))
        .await
        .map_err(Error::transport)?;
      return Ok(());
    }
  };

  let Some(current_id) = session.current_question() else {
    transport
      .ack_event(tap.event_id.clone(), Some(render::SESSION_EXPIRED.into()))
      .await
      .map_err(Error::transport)?;
    return Ok(());
  };

  let Some(question) = store.get_question(current_id).await.map_err(Error::store)?
  else {
    transport
      .ack_event(tap.event_id.clone(), Some(render::QUESTION_LOAD_ERROR.into()))
      .await
      .map_err(Error::transport)?;
    return Ok(());
  };

  let advance = engine::advance(&session, &question, option_index);

  store
    .record_attempt(Attempt {
      session_id,
      question_id:     current_id,
      category:        question.category.clone(),
      is_correct:      advance.is_correct,
      is_debt_attempt: advance.is_debt_attempt,
    })
    .await
    .map_err(Error::store)?;
  store
    .bump_question_stats(current_id, advance.is_correct)
    .await
    .map_err(Error::store)?;
  store
    .update_session_progress(
      session_id,
      advance.updated_queue.clone(),
      advance.next_index,
      advance.updated_debt_count,
    )
    .await
    .map_err(Error::store)?;

  let ack = if advance.is_correct { render::ACK_CORRECT } else { render::ACK_WRONG };
  transport
    .ack_event(tap.event_id.clone(), Some(ack.into()))
    .await
    .map_err(Error::transport)?;

  if advance.is_complete {
    store
      .mark_session_completed(session_id)
      .await
      .map_err(Error::store)?;
    let summary = render::summary(
      session.original_count,
      advance.updated_debt_count,
      advance.updated_queue.len(),
    );
    transport
      .edit_message(tap.chat_id, tap.message_id, summary, None)
      .await
      .map_err(Error::transport)?;
    return Ok(());
  }

  // The progress write above is already committed; a failed lookup here
  // only costs the prompt, not consistency.
  let next_id = advance.updated_queue[advance.next_index];
  match store.get_question(next_id).await.map_err(Error::store)? {
    None => {
      transport
        .edit_message(
          tap.chat_id,
          tap.message_id,
          render::NEXT_QUESTION_LOAD_ERROR.into(),
          None,
        )
        .await
        .map_err(Error::transport)?;
    }
    Some(next) => {
      let text = render::prompt(
        advance.next_index,
        advance.updated_queue.len(),
        advance.updated_debt_count,
        !advance.is_correct,
        &next.text,
      );
      let keyboard = render::option_keyboard(session_id, &next.options);
      transport
        .edit_message(tap.chat_id, tap.message_id, text, Some(keyboard))
        .await
        .map_err(Error::transport)?;
    }
  }

  Ok(())
}
