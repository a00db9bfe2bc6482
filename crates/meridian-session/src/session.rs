//! # Sale Session
//!
//! The live wizard session: one draft behind a mutex, the catalogue and
//! submission collaborators, and the autosave wiring.
//!
//! ## Thread Safety
//! The draft is wrapped in `Mutex<SaleDraft>` because:
//! 1. UI commands may arrive on any runtime thread
//! 2. Only one command should modify the draft at a time
//! 3. There is exactly one mutator (the cashier) - contention is nil
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SaleSession Lifecycle                                │
//! │                                                                         │
//! │  mount(session_id, ...) ── load snapshot ── freshness policy           │
//! │       │                        │                  │                     │
//! │       │                   restore draft    or start fresh              │
//! │       ▼                                                                 │
//! │  ┌──────────┐  add_to_cart / set_customer / next_step / ...            │
//! │  │  LIVE    │  every mutation ──► debounced autosave snapshot          │
//! │  └────┬─────┘                                                           │
//! │       │ complete()   (payment step, everything valid)                  │
//! │       ▼                                                                 │
//! │  submitting flag set ── assemble ── submit ──┬── Ok: clear draft,      │
//! │       (duplicate submits rejected)           │       discard pending,  │
//! │                                              │       clear store       │
//! │                                              └── Err: draft retained,  │
//! │                                                      cashier retries   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use meridian_core::validation::{validate_discount_rate, validate_sku, validate_unit_price};
use meridian_core::{
    Catalogue, Customer, DeliveryDetails, DiscountRate, DraftValidation, Line, Money,
    PaymentMethod, SaleDraft, SaleTotals, WizardStep,
};
use meridian_draft::{
    AutosaveConfig, AutosaveHandle, Autosaver, DraftEnvelope, DraftStore, RestoreDecision,
    SessionPolicy, DEFAULT_DEBOUNCE_MS, DRAFT_KEY,
};

use crate::error::{ApiError, ErrorCode};
use crate::submit::SubmitOrders;

// =============================================================================
// Configuration
// =============================================================================

/// Per-register session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Store key the draft persists under.
    pub draft_key: String,

    /// The store's base delivery fee, before add-on services.
    pub delivery_fee_base: Money,

    /// Autosave quiet period.
    pub debounce: Duration,

    /// Restore-or-discard freshness policy.
    pub policy: SessionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            draft_key: DRAFT_KEY.to_string(),
            delivery_fee_base: Money::zero(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            policy: SessionPolicy::default(),
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Cart response for the UI: lines plus the recomputed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<Line>,
    pub totals: SaleTotals,
}

/// Wizard position response for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub current_step: WizardStep,
    pub validation: DraftValidation,
    pub can_complete: bool,
}

// =============================================================================
// Sale Session
// =============================================================================

/// The wizard session runtime.
///
/// One instance per register session; the UI calls these operations and
/// renders the returned views. Every mutation schedules a debounced
/// draft snapshot - fire-and-forget, the UI never waits on storage.
pub struct SaleSession<S: DraftStore, O: SubmitOrders> {
    session_id: Uuid,
    config: SessionConfig,
    draft: Mutex<SaleDraft>,
    catalogue: Arc<dyn Catalogue + Send + Sync>,
    store: Arc<S>,
    autosave: AutosaveHandle,
    submitter: O,
    /// Guards against duplicate submits while a round-trip is in flight.
    submitting: AtomicBool,
}

impl<S: DraftStore, O: SubmitOrders> SaleSession<S, O> {
    /// Mounts the wizard: restores a stored draft when the freshness
    /// policy allows it, otherwise starts fresh.
    ///
    /// `session_id` is the shell's session marker - it survives reloads
    /// within one register session, which is exactly what makes a
    /// same-session reload restore instead of starting over.
    ///
    /// Mounting never fails: a broken store is logged and the session
    /// simply starts with an empty draft.
    pub async fn mount(
        session_id: Uuid,
        config: SessionConfig,
        catalogue: Arc<dyn Catalogue + Send + Sync>,
        store: S,
        submitter: O,
    ) -> Self {
        let store = Arc::new(store);

        let mut draft = SaleDraft::new(config.delivery_fee_base);
        match store.load(&config.draft_key).await {
            Ok(stored) => match config.policy.decide(stored, session_id, Utc::now()) {
                RestoreDecision::Restore(envelope) => {
                    info!(saved_at = %envelope.saved_at, "Restored draft snapshot");
                    draft = envelope.draft;
                }
                RestoreDecision::StartFresh { clear_store } => {
                    if clear_store {
                        info!("Discarding stale draft snapshot");
                        if let Err(err) = store.clear(&config.draft_key).await {
                            warn!(error = %err, "Failed to clear stale draft");
                        }
                    }
                }
            },
            Err(err) => {
                warn!(error = %err, "Draft load failed; starting fresh");
            }
        }

        let autosave = Autosaver::new(
            Arc::clone(&store),
            AutosaveConfig {
                key: config.draft_key.clone(),
                debounce: config.debounce,
            },
        )
        .start();

        SaleSession {
            session_id,
            config,
            draft: Mutex::new(draft),
            catalogue,
            store,
            autosave,
            submitter,
            submitting: AtomicBool::new(false),
        }
    }

    /// The session marker this wizard runs under.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // -------------------------------------------------------------------------
    // Draft Access
    // -------------------------------------------------------------------------

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleDraft) -> R,
    {
        let draft = self.draft.lock().expect("draft mutex poisoned");
        f(&draft)
    }

    /// Executes a mutation and schedules a debounced snapshot.
    ///
    /// The snapshot send is fire-and-forget: a full buffer just means
    /// this state is captured by the next mutation's snapshot instead.
    fn mutate<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleDraft) -> R,
    {
        let (result, envelope) = {
            let mut draft = self.draft.lock().expect("draft mutex poisoned");
            let result = f(&mut draft);
            let now = Utc::now();
            draft.saved_at = Some(now);
            let envelope = DraftEnvelope {
                session_id: self.session_id,
                saved_at: now,
                draft: draft.clone(),
            };
            (result, envelope)
        };

        if !self.autosave.try_snapshot(envelope) {
            debug!("Autosave buffer full; snapshot dropped");
        }
        result
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // -------------------------------------------------------------------------
    // Cart Operations
    // -------------------------------------------------------------------------

    /// The current cart with recomputed totals.
    pub fn cart(&self) -> CartView {
        self.with_draft(|d| CartView {
            lines: d.lines.lines().to_vec(),
            totals: d.totals(self.catalogue.as_ref()),
        })
    }

    /// Adds one unit of a SKU to the cart.
    ///
    /// The line-item store rejects silently; this boundary diffs the
    /// outcome into the user-visible error the UI needs.
    pub fn add_to_cart(&self, sku: &str, colour: Option<&str>) -> Result<CartView, ApiError> {
        validate_sku(sku)?;

        let catalogue = Arc::clone(&self.catalogue);
        let added = self.mutate(|d| d.lines.add_line(catalogue.as_ref(), sku, colour));

        match added {
            Some(line_id) => {
                debug!(sku = %sku, line_id, "Line added to cart");
                Ok(self.cart())
            }
            None if self.catalogue.get_product(sku).is_none() => {
                Err(ApiError::not_found("Product", sku))
            }
            None => Err(ApiError::cart(format!(
                "{} is not available to add right now",
                sku
            ))),
        }
    }

    /// Steps a line's quantity by `delta`.
    ///
    /// Stock clamping and the qty >= 1 floor are silent: the stepper UI
    /// just re-renders whatever the store settled on.
    pub fn update_quantity(&self, line_id: i64, delta: i64) -> CartView {
        let catalogue = Arc::clone(&self.catalogue);
        let changed = self.mutate(|d| d.lines.update_quantity(catalogue.as_ref(), line_id, delta));
        debug!(line_id, delta, changed, "Quantity updated");
        self.cart()
    }

    /// Removes a line.
    pub fn remove_line(&self, line_id: i64) -> CartView {
        let removed = self.mutate(|d| d.lines.remove_line(line_id));
        debug!(line_id, removed, "Line removed");
        self.cart()
    }

    /// Sets a negotiated unit price (manual discount).
    pub fn set_unit_price(&self, line_id: i64, price: Money) -> Result<CartView, ApiError> {
        validate_unit_price(price)?;
        self.mutate(|d| d.lines.set_price(line_id, price));
        Ok(self.cart())
    }

    /// Sets the overall percentage discount.
    pub fn set_discount(&self, rate: DiscountRate) -> Result<CartView, ApiError> {
        validate_discount_rate(rate.bps())?;
        self.mutate(|d| d.discount = rate);
        Ok(self.cart())
    }

    // -------------------------------------------------------------------------
    // Form Operations
    // -------------------------------------------------------------------------

    /// Replaces the customer details.
    pub fn set_customer(&self, customer: Customer) -> StepView {
        self.mutate(|d| d.customer = customer);
        self.step_view()
    }

    /// Replaces the delivery details.
    pub fn set_delivery(&self, delivery: DeliveryDetails) -> StepView {
        self.mutate(|d| d.delivery = delivery);
        self.step_view()
    }

    /// Selects the payment method.
    ///
    /// Picking financing seeds the deposit with the computed 30% default
    /// when the cashier hasn't entered one yet.
    pub fn set_payment_method(&self, method: PaymentMethod) -> StepView {
        let catalogue = Arc::clone(&self.catalogue);
        self.mutate(|d| {
            d.payment_method = Some(method);
            if method == PaymentMethod::Financing && d.deposit.is_none() {
                d.deposit = Some(d.totals(catalogue.as_ref()).deposit);
            }
        });
        self.step_view()
    }

    /// Overrides the financing deposit, clamped into `[0, total]`.
    pub fn set_deposit(&self, deposit: Money) -> StepView {
        let catalogue = Arc::clone(&self.catalogue);
        self.mutate(|d| {
            let total = d.totals(catalogue.as_ref()).total;
            d.deposit = Some(deposit.clamp(Money::zero(), total));
        });
        self.step_view()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// The current wizard position and validation state.
    pub fn step_view(&self) -> StepView {
        let today = Self::today();
        self.with_draft(|d| StepView {
            current_step: d.current_step(),
            validation: d.validate(today),
            can_complete: d.can_complete(today),
        })
    }

    /// Tries to advance to the next step.
    pub fn next_step(&self) -> StepView {
        let today = Self::today();
        let moved = self.mutate(|d| d.next_step(today));
        debug!(moved, "next_step");
        self.step_view()
    }

    /// Moves back one step.
    pub fn prev_step(&self) -> StepView {
        let moved = self.mutate(|d| d.prev_step());
        debug!(moved, "prev_step");
        self.step_view()
    }

    /// Jumps directly to a step, when the navigator permits it.
    pub fn go_to_step(&self, step: WizardStep) -> StepView {
        let moved = self.mutate(|d| d.go_to_step(step));
        debug!(?step, moved, "go_to_step");
        self.step_view()
    }

    /// Current totals breakdown.
    pub fn totals(&self) -> SaleTotals {
        self.with_draft(|d| d.totals(self.catalogue.as_ref()))
    }

    // -------------------------------------------------------------------------
    // Completion
    // -------------------------------------------------------------------------

    /// Submits the sale.
    ///
    /// Rejected with `SUBMIT_IN_PROGRESS` while a previous submission is
    /// still in flight. On success the draft and its stored snapshot are
    /// cleared; on failure everything is retained for a retry.
    pub async fn complete(&self) -> Result<String, ApiError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ApiError::new(
                ErrorCode::SubmitInProgress,
                "An order submission is already in progress",
            ));
        }

        let result = self.submit_once().await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_once(&self) -> Result<String, ApiError> {
        let today = Self::today();
        let order = self.with_draft(|d| d.assemble_order(self.catalogue.as_ref(), today))?;

        debug!(
            lines = order.lines.len(),
            total = %order.totals.total,
            "Submitting order"
        );
        let order_id = self.submitter.submit(order).await?;

        // Success: reset the draft, then make sure no pre-submission
        // snapshot can land afterwards and resurrect the sale.
        self.draft.lock().expect("draft mutex poisoned").clear();
        if let Err(err) = self.autosave.discard().await {
            warn!(error = %err, "Failed to discard pending snapshot");
        }
        if let Err(err) = self.store.clear(&self.config.draft_key).await {
            warn!(error = %err, "Failed to clear stored draft");
        }

        info!(order_id = %order_id, "Sale submitted; draft cleared");
        Ok(order_id)
    }

    /// Graceful teardown: writes any pending snapshot, then stops the
    /// autosaver.
    pub async fn shutdown(&self) {
        if let Err(err) = self.autosave.flush().await {
            warn!(error = %err, "Autosave flush failed during shutdown");
        }
        if let Err(err) = self.autosave.shutdown().await {
            warn!(error = %err, "Autosave shutdown failed");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
