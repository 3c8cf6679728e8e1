//! Background work requested by the UI.
//!
//! The app never awaits the network itself. State transitions return
//! [`Command`]s; [`spawn_command`] runs each on the runtime and reports back
//! through the event channel.

use crate::controller::{self, MutationKind};
use crate::events::TuiEvent;
use aptime_core::{EntityKind, Identity, LoginForm, PasswordChange, Record, RecordId, RemoteData};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    LoadPage {
        kind: EntityKind,
        generation: u64,
    },
    Submit {
        kind: EntityKind,
        payload: Record,
        editing: Option<RecordId>,
    },
    Delete {
        kind: EntityKind,
        id: RecordId,
    },
    Login(LoginForm),
    ChangePassword {
        change: PasswordChange,
        identity: Identity,
    },
    LoadGrid {
        tid: RecordId,
        generation: u64,
    },
}

/// Run `command` in the background. `Quit` is handled by the loop and ignored here.
pub fn spawn_command(
    remote: Arc<dyn RemoteData>,
    command: Command,
    sender: mpsc::Sender<TuiEvent>,
) {
    tokio::spawn(async move {
        if let Some(event) = run_command(remote.as_ref(), command).await {
            if sender.send(event).await.is_err() {
                tracing::debug!("event loop closed before result arrived");
            }
        }
    });
}

/// Execute `command` and produce the event carrying its result.
pub async fn run_command(remote: &dyn RemoteData, command: Command) -> Option<TuiEvent> {
    let event = match command {
        Command::Quit => return None,
        Command::LoadPage { kind, generation } => TuiEvent::PageLoaded {
            generation,
            load: Box::new(controller::load_page(remote, kind).await),
        },
        Command::Submit {
            kind,
            payload,
            editing,
        } => TuiEvent::MutationDone {
            kind,
            op: MutationKind::Save,
            result: controller::submit_form(remote, kind, payload, editing).await,
        },
        Command::Delete { kind, id } => TuiEvent::MutationDone {
            kind,
            op: MutationKind::Delete,
            result: controller::delete_record(remote, kind, id).await,
        },
        Command::Login(form) => TuiEvent::SignedIn(controller::login(remote, &form).await),
        Command::ChangePassword { change, identity } => TuiEvent::PasswordChanged(
            controller::change_password(remote, &change, &identity).await,
        ),
        Command::LoadGrid { tid, generation } => TuiEvent::GridLoaded {
            generation,
            result: Box::new(controller::load_timetable_grid(remote, tid).await),
        },
    };
    Some(event)
}
