//! Per-page form UI state.
//!
//! Every entity kind shares the same `{ loading, error, field_errors }` shape and
//! differs only in its extras (photo preview, pending delete). [`FormState`] is the
//! single reducer; the extras bring their own small action vocabulary.

use std::{collections::BTreeMap, convert::Infallible, fmt};

use shared::domain::{RoomId, SpeakerId, TalkId};

/// Field name to error message. Empty means the form is valid.
pub type FieldErrors = BTreeMap<String, String>;

/// Key under which a failed remote call is published.
pub const REMOTE_ERROR_FIELD: &str = "error";

pub trait Extras: Default + Clone + fmt::Debug + PartialEq {
    type Action: fmt::Debug;

    fn reduce(&mut self, action: Self::Action);
}

impl Extras for () {
    type Action = Infallible;

    fn reduce(&mut self, action: Infallible) {
        match action {}
    }
}

#[derive(Debug)]
pub enum FormAction<A> {
    LoadingStart,
    LoadingEnd,
    ErrorSet(FieldErrors),
    SetInitialState,
    Extra(A),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteModal<Id> {
    pub pending_delete: Option<Id>,
}

impl<Id> Default for DeleteModal<Id> {
    fn default() -> Self {
        Self {
            pending_delete: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteModalAction<Id> {
    Open(Id),
    Close,
}

impl<Id> Extras for DeleteModal<Id>
where
    Id: Clone + fmt::Debug + PartialEq,
{
    type Action = DeleteModalAction<Id>;

    fn reduce(&mut self, action: Self::Action) {
        self.pending_delete = match action {
            DeleteModalAction::Open(id) => Some(id),
            DeleteModalAction::Close => None,
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerExtras {
    pub photo_preview: String,
    pub delete: DeleteModal<SpeakerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerAction {
    SetPhotoPreview(String),
    DeleteModal(DeleteModalAction<SpeakerId>),
}

impl Extras for SpeakerExtras {
    type Action = SpeakerAction;

    fn reduce(&mut self, action: Self::Action) {
        match action {
            SpeakerAction::SetPhotoPreview(url) => self.photo_preview = url,
            SpeakerAction::DeleteModal(action) => self.delete.reduce(action),
        }
    }
}

/// Extras that carry a delete-confirmation modal.
pub trait PendingDelete: Extras {
    type Id: Clone + fmt::Debug + PartialEq;

    fn pending_delete(&self) -> Option<&Self::Id>;
    fn modal_action(action: DeleteModalAction<Self::Id>) -> Self::Action;
}

impl<Id> PendingDelete for DeleteModal<Id>
where
    Id: Clone + fmt::Debug + PartialEq,
{
    type Id = Id;

    fn pending_delete(&self) -> Option<&Id> {
        self.pending_delete.as_ref()
    }

    fn modal_action(action: DeleteModalAction<Id>) -> Self::Action {
        action
    }
}

impl PendingDelete for SpeakerExtras {
    type Id = SpeakerId;

    fn pending_delete(&self) -> Option<&SpeakerId> {
        self.delete.pending_delete.as_ref()
    }

    fn modal_action(action: DeleteModalAction<SpeakerId>) -> SpeakerAction {
        SpeakerAction::DeleteModal(action)
    }
}

/// One store slice. `error` is derived from `field_errors` and never set on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<X: Extras> {
    loading: bool,
    error: bool,
    field_errors: FieldErrors,
    extras: X,
}

impl<X: Extras> Default for FormState<X> {
    fn default() -> Self {
        Self {
            loading: false,
            error: false,
            field_errors: FieldErrors::new(),
            extras: X::default(),
        }
    }
}

impl<X: Extras> FormState<X> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: FormAction<X::Action>) {
        match action {
            FormAction::LoadingStart => self.loading = true,
            FormAction::LoadingEnd => self.loading = false,
            FormAction::ErrorSet(errors) => {
                self.error = !errors.is_empty();
                self.field_errors = errors;
            }
            FormAction::SetInitialState => *self = Self::default(),
            FormAction::Extra(action) => self.extras.reduce(action),
        }
    }

    pub fn loading_start(&mut self) {
        self.dispatch(FormAction::LoadingStart);
    }

    pub fn loading_end(&mut self) {
        self.dispatch(FormAction::LoadingEnd);
    }

    pub fn error_set(&mut self, errors: FieldErrors) {
        self.dispatch(FormAction::ErrorSet(errors));
    }

    pub fn set_initial_state(&mut self) {
        self.dispatch(FormAction::SetInitialState);
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn extras(&self) -> &X {
        &self.extras
    }
}

impl<X: PendingDelete> FormState<X> {
    pub fn open_delete_modal(&mut self, id: X::Id) {
        self.dispatch(FormAction::Extra(X::modal_action(DeleteModalAction::Open(id))));
    }

    pub fn close_delete_modal(&mut self) {
        self.dispatch(FormAction::Extra(X::modal_action(DeleteModalAction::Close)));
    }

    pub fn pending_delete_id(&self) -> Option<&X::Id> {
        self.extras.pending_delete()
    }
}

impl FormState<SpeakerExtras> {
    pub fn set_photo_preview(&mut self, url: impl Into<String>) {
        self.dispatch(FormAction::Extra(SpeakerAction::SetPhotoPreview(url.into())));
    }

    pub fn photo_preview(&self) -> &str {
        &self.extras.photo_preview
    }
}

pub type SpeakerFormState = FormState<SpeakerExtras>;
pub type TalkFormState = FormState<DeleteModal<TalkId>>;
pub type RoomFormState = FormState<DeleteModal<RoomId>>;
pub type RegisterFormState = FormState<()>;
pub type LoginFormState = FormState<()>;

/// Builds a single-entry error mapping, used for remote failures.
pub fn single_error(field: &str, message: impl Into<String>) -> FieldErrors {
    FieldErrors::from([(field.to_string(), message.into())])
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
