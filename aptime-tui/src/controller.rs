//! Page controller: the async work behind every view.
//!
//! Functions here talk to a [`RemoteData`] and return plain results. They
//! never touch UI state; the event loop applies what they return.

use aptime_core::{
    AuthError, EntityKind, GridError, Identity, LoginForm, PasswordChange, Record, RecordId,
    RemoteData, RemoteError, RemoteResult, TimetableSummary,
};
use futures_util::future::{join, join_all};

/// Outcome of loading one entity page. Every list reports on its own.
#[derive(Debug, Clone)]
pub struct PageLoad {
    pub kind: EntityKind,
    pub primary: RemoteResult<Vec<Record>>,
    pub references: Vec<(EntityKind, RemoteResult<Vec<Record>>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created {
        submitted: Record,
        returned: Option<Record>,
    },
    Updated {
        id: RecordId,
        record: Record,
    },
    Deleted {
        id: RecordId,
    },
}

/// Which request a mutation result answers, known even when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Save,
    Delete,
}

impl MutationKind {
    pub fn failure_context(self, noun: &str) -> String {
        match self {
            MutationKind::Save => format!("Failed to save {}", noun),
            MutationKind::Delete => format!("Failed to delete {}", noun),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub kind: EntityKind,
    pub mutation: Mutation,
    /// Server message, if it sent one.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Data behind the timetable grid view.
#[derive(Debug, Clone)]
pub struct GridLoad {
    pub tid: RecordId,
    pub summary: TimetableSummary,
    pub offerings: RemoteResult<Vec<Record>>,
    pub rooms: RemoteResult<Vec<Record>>,
}

async fn fetch_list<R: RemoteData + ?Sized>(remote: &R, kind: EntityKind) -> RemoteResult<Vec<Record>> {
    remote.fetch(kind.resource()).await?.into_records()
}

/// Fetch the primary list and every reference list concurrently.
pub async fn load_page<R: RemoteData + ?Sized>(remote: &R, kind: EntityKind) -> PageLoad {
    let mut kinds = vec![kind];
    kinds.extend(kind.schema().reference_kinds());

    let mut results = join_all(kinds.iter().map(|k| fetch_list(remote, *k))).await;
    let primary = results.remove(0);
    let references: Vec<_> = kinds[1..].iter().copied().zip(results).collect();

    match &primary {
        Ok(rows) => tracing::debug!(kind = kind.resource(), rows = rows.len(), "page loaded"),
        Err(err) => tracing::warn!(kind = kind.resource(), error = %err, "page load failed"),
    }
    PageLoad {
        kind,
        primary,
        references,
    }
}

fn server_message(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Create when `editing` is `None`, otherwise update that record.
pub async fn submit_form<R: RemoteData + ?Sized>(
    remote: &R,
    kind: EntityKind,
    payload: Record,
    editing: Option<RecordId>,
) -> RemoteResult<MutationOutcome> {
    let resource = kind.resource();
    match editing {
        None => {
            let envelope = remote.create(resource, &payload).await?;
            let message = server_message(envelope.message.clone());
            let returned = envelope.into_record()?;
            tracing::info!(kind = resource, "record created");
            Ok(MutationOutcome {
                kind,
                mutation: Mutation::Created {
                    submitted: payload,
                    returned,
                },
                message,
            })
        }
        Some(id) => {
            let envelope = remote.update(resource, &id, &payload).await?;
            let message = server_message(envelope.message.clone());
            let returned = envelope.into_record()?;
            let record = match returned {
                Some(record) if id.matches(&record) => record,
                _ => payload.with(id.field().name(), id.to_json()),
            };
            tracing::info!(kind = resource, id = %id, "record updated");
            Ok(MutationOutcome {
                kind,
                mutation: Mutation::Updated { id, record },
                message,
            })
        }
    }
}

pub async fn delete_record<R: RemoteData + ?Sized>(
    remote: &R,
    kind: EntityKind,
    id: RecordId,
) -> RemoteResult<MutationOutcome> {
    let envelope = remote.delete(kind.resource(), &id).await?;
    let message = server_message(envelope.message.clone());
    envelope.into_data()?;
    tracing::info!(kind = kind.resource(), id = %id, "record deleted");
    Ok(MutationOutcome {
        kind,
        mutation: Mutation::Deleted { id },
        message,
    })
}

pub async fn login<R: RemoteData + ?Sized>(remote: &R, form: &LoginForm) -> Result<Identity, ActionError> {
    let envelope = remote.call("login", &form.payload()).await?;
    let record = envelope.into_record()?.ok_or(AuthError::MissingIdentity)?;
    Ok(Identity::from_record(&record)?)
}

/// Returns the server's confirmation message.
pub async fn change_password<R: RemoteData + ?Sized>(
    remote: &R,
    change: &PasswordChange,
    identity: &Identity,
) -> RemoteResult<String> {
    let envelope = remote.call("changepassword", &change.payload(identity)).await?;
    let message = envelope
        .message_or("Password changed successfully.")
        .to_string();
    envelope.into_data()?;
    Ok(message)
}

/// Summary first, then offerings and rooms concurrently.
pub async fn load_timetable_grid<R: RemoteData + ?Sized>(
    remote: &R,
    tid: RecordId,
) -> Result<GridLoad, ActionError> {
    let query = Record::new().with(tid.field().name(), tid.to_json());
    let rows = remote.call("getimetable", &query).await?.into_records()?;
    let first = rows.first().ok_or_else(|| GridError::InvalidSummary {
        reason: format!("no timetable found for {}", tid),
    })?;
    let summary = TimetableSummary::from_record(first)?;

    let offerings = async {
        remote
            .call("getfacultybytimetable", &summary.faculty_query())
            .await?
            .into_records()
    };
    let (offerings, rooms) = join(offerings, fetch_list(remote, EntityKind::Classroom)).await;

    Ok(GridLoad {
        tid,
        summary,
        offerings,
        rooms,
    })
}

/// Notification text for a failed remote operation. Server rejections are
/// shown as sent; transport problems are prefixed with what was attempted.
pub fn describe_error(context: &str, err: &RemoteError) -> String {
    match err {
        RemoteError::Rejected { message } => message.clone(),
        other => format!("{}: {}", context, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error_wording() {
        let rejected = RemoteError::Rejected {
            message: "Department already exists".into(),
        };
        assert_eq!(describe_error("Failed to add Department", &rejected), "Department already exists");

        let transport = RemoteError::Transport("connection refused".into());
        assert_eq!(
            describe_error("Failed to add Department", &transport),
            "Failed to add Department: No response from server: connection refused"
        );
    }
}
