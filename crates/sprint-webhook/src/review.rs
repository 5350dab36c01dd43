//! Review Resolution Controller.
//!
//! Two independent forward-only state machines over the flaw deck: poll
//! capture (`pending → caught | missed`) and graveyard re-confirmation
//! (`missed → reviewed`, or a defer self-loop). Both guard on the current
//! status, so a duplicate delivery of the same event re-applies nothing.

use sprint_core::{
  callback::ReviewAction,
  review::{GraveyardResolution, PollResolution, ReviewStatus},
  store::PracticeStore,
  transport::ChatTransport,
};
use uuid::Uuid;

use crate::{error::Error, render, TapEvent};

/// Handle a vote in the daily flaw poll.
///
/// `active_item` is the "problem of the day" pointer, read by the caller
/// and passed in explicitly. No pointer, no vote options, or no such item
/// means the event is dropped without effect — deliberately, not as an
/// error.
pub async fn handle_poll_vote<S, T>(
  store: &S,
  transport: &T,
  chat_id: i64,
  active_item: Option<Uuid>,
  option_ids: &[usize],
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let Some(item_id) = active_item else { return Ok(()) };
  // Multi-select is not supported by this quiz format; only the first
  // chosen option counts.
  let Some(&chosen) = option_ids.first() else { return Ok(()) };
  let Some(item) = store.get_review_item(item_id).await.map_err(Error::store)?
  else {
    return Ok(());
  };

  match item.resolve_vote(chosen) {
    PollResolution::AlreadyResolved => Ok(()),
    PollResolution::Resolved { caught } => {
      let status = if caught { ReviewStatus::Caught } else { ReviewStatus::Missed };
      store
        .set_review_status(item_id, status)
        .await
        .map_err(Error::store)?;
      store
        .close_daily_log(item_id, caught)
        .await
        .map_err(Error::store)?;
      transport
        .send_message(chat_id, render::poll_confirmation(caught), None)
        .await
        .map_err(Error::transport)?;
      Ok(())
    }
  }
}

/// Handle a graveyard button tap (`gy|<item-id>|<action>`).
pub async fn handle_graveyard<S, T>(
  store: &S,
  transport: &T,
  tap: &TapEvent,
  item_id: Uuid,
  action: ReviewAction,
) -> Result<(), Error>
where
  S: PracticeStore,
  T: ChatTransport,
{
  let Some(item) = store.get_review_item(item_id).await.map_err(Error::store)?
  else {
    transport
      .ack_event(tap.event_id.clone(), Some(render::ALREADY_RESOLVED.into()))
      .await
      .map_err(Error::transport)?;
    return Ok(());
  };

  match item.apply_graveyard(action) {
    GraveyardResolution::AlreadyResolved => {
      transport
        .ack_event(tap.event_id.clone(), Some(render::ALREADY_RESOLVED.into()))
        .await
        .map_err(Error::transport)?;
    }
    GraveyardResolution::Cleared => {
      store
        .set_review_status(item_id, ReviewStatus::Reviewed)
        .await
        .map_err(Error::store)?;
      transport
        .ack_event(tap.event_id.clone(), None)
        .await
        .map_err(Error::transport)?;
      transport
        .edit_message(tap.chat_id, tap.message_id, render::GRAVEYARD_CLEARED.into(), None)
        .await
        .map_err(Error::transport)?;
    }
    GraveyardResolution::Deferred => {
      // No status change, but the user still gets exactly one visible
      // confirmation.
      transport
        .ack_event(tap.event_id.clone(), None)
        .await
        .map_err(Error::transport)?;
      transport
        .edit_message(tap.chat_id, tap.message_id, render::GRAVEYARD_DEFERRED.into(), None)
        .await
        .map_err(Error::transport)?;
    }
  }

  Ok(())
}
