//! Form submission: validate, publish errors, run the mutation, then reset and
//! navigate or publish the remote failure.

use std::future::Future;

use client_core::{ClientResult, ConferenceBackend, FileUpload, FileUploader};
use shared::{
    domain::{FileId, SpeakerId},
    error::ErrorCode,
    protocol::SpeakerInput,
};
use tracing::{debug, info, warn};

use crate::{
    navigation::{Navigator, Route},
    store::{single_error, Extras, FieldErrors, FormState, REMOTE_ERROR_FIELD},
};

/// A form that validates itself and knows the payload it submits.
pub trait FormSubmission {
    type Payload;

    fn validate(&self) -> FieldErrors;
    fn payload(&self) -> Self::Payload;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    Invalid(FieldErrors),
    Succeeded { value: T, destination: Route },
    Failed { code: ErrorCode, message: String },
}

impl<T> SubmitOutcome<T> {
    pub fn phase(&self) -> SubmitPhase {
        match self {
            Self::Invalid(_) => SubmitPhase::Invalid,
            Self::Succeeded { .. } => SubmitPhase::Succeeded,
            Self::Failed { .. } => SubmitPhase::Failed,
        }
    }

    pub fn destination(&self) -> Option<&Route> {
        match self {
            Self::Succeeded { destination, .. } => Some(destination),
            _ => None,
        }
    }
}

/// Runs one submission against `store`.
///
/// Validation errors are always published, an empty mapping included. The
/// mutation is only invoked for a valid form. On success the store is reset and
/// `navigator` is sent to `destination`; on failure loading ends and the
/// classified message is published under [`REMOTE_ERROR_FIELD`].
pub async fn submit<X, F, T, M, Fut>(
    store: &mut FormState<X>,
    form: &F,
    navigator: &dyn Navigator,
    destination: Route,
    mutate: M,
) -> SubmitOutcome<T>
where
    X: Extras,
    F: FormSubmission,
    M: FnOnce(F::Payload) -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    debug!(phase = ?SubmitPhase::Validating, destination = %destination, "submitting form");
    let errors = form.validate();
    store.error_set(errors.clone());
    if !errors.is_empty() {
        debug!(phase = ?SubmitPhase::Invalid, fields = errors.len(), "form rejected");
        return SubmitOutcome::Invalid(errors);
    }

    store.loading_start();
    debug!(phase = ?SubmitPhase::Submitting, "mutation started");
    match mutate(form.payload()).await {
        Ok(value) => {
            store.set_initial_state();
            navigator.push(destination.clone());
            info!(destination = %destination, "mutation succeeded");
            SubmitOutcome::Succeeded { value, destination }
        }
        Err(err) => {
            let code = err.code();
            let message = err.user_message();
            warn!(error = %err, ?code, "mutation failed");
            store.loading_end();
            store.error_set(single_error(REMOTE_ERROR_FIELD, message.clone()));
            SubmitOutcome::Failed { code, message }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerTarget {
    Create,
    Update(SpeakerId),
}

/// Uploads a new photo when one is attached, otherwise keeps `existing_photo`,
/// then creates or updates the speaker.
pub async fn save_speaker<B, U>(
    backend: &B,
    uploader: &U,
    target: &SpeakerTarget,
    mut input: SpeakerInput,
    photo: Option<FileUpload>,
    existing_photo: Option<FileId>,
) -> ClientResult<SpeakerId>
where
    B: ConferenceBackend + ?Sized,
    U: FileUploader + ?Sized,
{
    input.photo_id = match photo {
        Some(file) => {
            let uploaded = uploader.upload(file).await?;
            debug!(file = %uploaded.id, "photo uploaded");
            Some(uploaded.id)
        }
        None => existing_photo,
    };
    match target {
        SpeakerTarget::Create => backend.create_speaker(&input).await,
        SpeakerTarget::Update(id) => {
            backend.update_speaker(id, &input).await?;
            Ok(id.clone())
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
