//! View-state synchronizer for the count screen.
//!
//! # Design
//! `CountView` owns the only copy of [`ViewState`] and is the only thing that
//! mutates it. Every mutation goes to the server and is followed by a full
//! [`CountView::refresh`]; the client never derives values locally.
//!
//! Methods that hit the network take `&mut self` and block until the
//! round-trip finishes, so two operations can never interleave on one view
//! and a stale refresh can never overwrite a newer one. Each method also
//! returns the SDK result so callers see the failure path in the type, while
//! the user-facing message lands in `error_message`.

use tracing::debug;

use crate::error::{SdkError, SdkResult};
use crate::sdk::CountSdk;
use crate::transport::Transport;
use crate::types::{Count, CreateCount, UpdateCount};

/// UI-facing state of the count screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Server order, as returned by the last successful refresh.
    pub counts: Vec<Count>,
    pub selected: Option<Count>,
    /// Value typed into the create/update input.
    pub pending_value: i64,
    pub loading: bool,
    /// Last failure; replaced by the next one, cleared when an operation starts.
    pub error_message: Option<String>,
}

pub struct CountView<T> {
    sdk: CountSdk<T>,
    state: ViewState,
}

impl<T: Transport> CountView<T> {
    pub fn new(sdk: CountSdk<T>) -> Self {
        Self {
            sdk,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn sdk(&self) -> &CountSdk<T> {
        &self.sdk
    }

    /// Reload the full list from the server and drop the selection.
    pub fn refresh(&mut self) -> SdkResult<()> {
        self.begin();
        let result = self.sdk.list_counts().map(|counts| {
            debug!(count = counts.len(), "refreshed counts");
            self.state.counts = counts;
            self.state.selected = None;
        });
        if let Err(err) = &result {
            self.fail(err);
        }
        self.state.loading = false;
        result
    }

    /// Create a count from `pending_value`. The input resets only on success.
    pub fn create(&mut self) -> SdkResult<Count> {
        self.begin();
        let input = CreateCount {
            value: self.state.pending_value,
        };
        let result = self.sdk.create_count(&input);
        match &result {
            Ok(_) => {
                self.state.pending_value = 0;
                let _ = self.refresh();
            }
            Err(err) => self.fail(err),
        }
        self.state.loading = false;
        result
    }

    /// Write `pending_value` into the selected count. Does nothing and
    /// returns `Ok(None)` when nothing is selected.
    pub fn update(&mut self) -> SdkResult<Option<Count>> {
        let Some(id) = self.state.selected.as_ref().map(|c| c.id) else {
            return Ok(None);
        };
        self.begin();
        let input = UpdateCount {
            value: self.state.pending_value,
        };
        let result = self.sdk.update_count(id, &input);
        match &result {
            Ok(_) => {
                let _ = self.refresh();
            }
            Err(err) => self.fail(err),
        }
        self.state.loading = false;
        result.map(Some)
    }

    pub fn delete(&mut self, id: i64) -> SdkResult<Count> {
        let result = self.mutate(|sdk| sdk.delete_count(id));
        self.settle(result)
    }

    pub fn increment(&mut self, id: i64) -> SdkResult<Count> {
        let result = self.mutate(|sdk| sdk.increment_count(id));
        self.settle(result)
    }

    pub fn decrement(&mut self, id: i64) -> SdkResult<Count> {
        let result = self.mutate(|sdk| sdk.decrement_count(id));
        self.settle(result)
    }

    pub fn select(&mut self, count: Count) {
        self.state.pending_value = count.value;
        self.state.selected = Some(count);
    }

    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    pub fn set_pending_value(&mut self, value: i64) {
        self.state.pending_value = value;
    }

    /// Set the pending value from raw text input; anything without a leading
    /// integer becomes 0.
    pub fn set_pending_input(&mut self, input: &str) {
        self.state.pending_value = parse_leading_int(input).unwrap_or(0);
    }

    pub fn dismiss_error(&mut self) {
        self.state.error_message = None;
    }

    fn mutate(&mut self, call: impl FnOnce(&CountSdk<T>) -> SdkResult<Count>) -> SdkResult<Count> {
        self.begin();
        call(&self.sdk)
    }

    /// Refresh whatever the mutation did; its own failure is the message
    /// left on screen.
    fn settle(&mut self, result: SdkResult<Count>) -> SdkResult<Count> {
        let _ = self.refresh();
        if let Err(err) = &result {
            self.fail(err);
        }
        self.state.loading = false;
        result
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error_message = None;
    }

    fn fail(&mut self, err: &SdkError) {
        self.state.error_message = Some(err.message.clone());
    }
}

/// Leading optionally-signed decimal integer, ignoring leading whitespace.
fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}
