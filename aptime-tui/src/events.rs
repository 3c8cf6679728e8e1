//! Event types for the console event loop.

use crate::controller::{ActionError, GridLoad, MutationKind, MutationOutcome, PageLoad};
use aptime_core::{EntityKind, Identity, RemoteResult};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    PageLoaded {
        generation: u64,
        load: Box<PageLoad>,
    },
    MutationDone {
        kind: EntityKind,
        op: MutationKind,
        result: RemoteResult<MutationOutcome>,
    },
    SignedIn(Result<Identity, ActionError>),
    PasswordChanged(RemoteResult<String>),
    GridLoaded {
        generation: u64,
        result: Box<Result<GridLoad, ActionError>>,
    },
    ApiError(String),
}
