use crate::application::worker::ChargeQueue;
use crate::config::ProcessorConfig;
use crate::domain::card;
use crate::domain::charge::{Amount, Charge, ChargeId, ChargeStatus, RiderId};
use crate::domain::ports::{AuthorizerRef, ChargeStoreBox, NotifierRef};
use crate::error::{BillingError, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Subject line of overdue notifications.
pub const NOTIFICATION_SUBJECT: &str = "Cobrança em atraso";

/// Result of running a charge through `ChargeProcessor::execute_charge`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The charge was authorized and is now awaiting payment.
    Charged(Charge),
    /// The charge had already left `Pending`; nothing was done.
    AlreadyProcessed(Charge),
}

impl ExecutionOutcome {
    pub fn charge(&self) -> &Charge {
        match self {
            ExecutionOutcome::Charged(charge) | ExecutionOutcome::AlreadyProcessed(charge) => charge,
        }
    }
}

/// Drives the charge lifecycle.
///
/// `ChargeProcessor` keeps no copies of charges: every read and write goes
/// through the store it was built with. The authorizer and notifier are always
/// awaited without holding a store lock.
pub struct ChargeProcessor {
    store: ChargeStoreBox,
    authorizer: AuthorizerRef,
    notifier: NotifierRef,
    config: ProcessorConfig,
    queue: mpsc::UnboundedSender<ChargeId>,
}

impl ChargeProcessor {
    /// Creates a processor and the consuming half of its processing queue.
    ///
    /// # Arguments
    ///
    /// * `store` - Owner of all charges.
    /// * `authorizer` - The payment network.
    /// * `notifier` - Channel used to reach riders.
    /// * `config` - Thresholds and timeouts.
    pub fn new(
        store: ChargeStoreBox,
        authorizer: AuthorizerRef,
        notifier: NotifierRef,
        config: ProcessorConfig,
    ) -> (Self, ChargeQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let processor = Self {
            store,
            authorizer,
            notifier,
            config,
            queue: sender,
        };
        (processor, ChargeQueue::new(receiver))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Opens a new pending charge for a rider, requested now.
    pub async fn open_charge(
        &self,
        rider: RiderId,
        amount: Amount,
        card_number: impl Into<String>,
    ) -> Result<Charge> {
        let card_number = card_number.into();
        loop {
            let id = self.store.next_id().await?;
            let charge = Charge::new(id, rider, Utc::now(), amount, card_number.clone());
            match self.store.add(charge.clone()).await {
                Ok(()) => {
                    info!(charge = %id, %rider, %amount, "charge opened");
                    return Ok(charge);
                }
                // Another caller took the id between next_id and add.
                Err(BillingError::DuplicateCharge(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Replaces the stored charges wholesale.
    pub async fn load_charges(&self, charges: Vec<Charge>) -> Result<()> {
        self.store.replace_all(charges).await
    }

    pub async fn get_charge(&self, id: ChargeId) -> Result<Option<Charge>> {
        self.store.get(id).await
    }

    pub async fn charges(&self) -> Result<Vec<Charge>> {
        self.store.all().await
    }

    /// Asks the authorizer whether `amount` can be captured from `card_number`.
    ///
    /// Touches no charge and never fails: a timeout reads as `false`.
    pub async fn attempt_payment(&self, amount: Amount, card_number: &str) -> bool {
        match tokio::time::timeout(
            self.config.authorization_timeout,
            self.authorizer.authorize(amount, card_number),
        )
        .await
        {
            Ok(approved) => approved,
            Err(_) => {
                warn!(%amount, "authorization timed out");
                false
            }
        }
    }

    /// Charges a pending charge and moves it to `AwaitingPayment`.
    ///
    /// Fails with `PaymentNotAuthorized` when the card is empty or fails the
    /// checksum, when the amount is above the configured limit, or when the
    /// authorizer refuses. The stored charge is left untouched in that case.
    /// A charge that already left `Pending` is reported as `AlreadyProcessed`
    /// without calling the authorizer again.
    pub async fn execute_charge(&self, id: ChargeId) -> Result<ExecutionOutcome> {
        let charge = self.store.get(id).await?.ok_or(BillingError::NotFound(id))?;
        if !charge.is_pending() {
            debug!(charge = %id, status = %charge.status, "charge already processed");
            return Ok(ExecutionOutcome::AlreadyProcessed(charge));
        }

        if let Err(e) = self.authorize_charge(&charge).await {
            warn!(charge = %id, rider = %charge.rider, "charge not authorized");
            return Err(e);
        }

        let updated = self
            .store
            .transition(
                id,
                ChargeStatus::Pending,
                ChargeStatus::AwaitingPayment,
                Some(Utc::now()),
            )
            .await?;

        match updated {
            Some(charge) => {
                info!(charge = %id, amount = %charge.amount, "charge awaiting payment");
                Ok(ExecutionOutcome::Charged(charge))
            }
            None => {
                let current = self.store.get(id).await?.ok_or(BillingError::NotFound(id))?;
                Ok(ExecutionOutcome::AlreadyProcessed(current))
            }
        }
    }

    async fn authorize_charge(&self, charge: &Charge) -> Result<()> {
        if charge.card.is_empty() || !card::validate(&charge.card) {
            return Err(BillingError::PaymentNotAuthorized);
        }
        if let Some(max) = self.config.max_charge_amount
            && charge.amount.value() > max
        {
            return Err(BillingError::PaymentNotAuthorized);
        }
        if !self.attempt_payment(charge.amount, &charge.card).await {
            return Err(BillingError::PaymentNotAuthorized);
        }
        Ok(())
    }

    /// Pending charges older than the overdue threshold, as of now.
    pub async fn list_overdue_charges(&self) -> Result<Vec<Charge>> {
        self.list_overdue_charges_at(Utc::now()).await
    }

    pub async fn list_overdue_charges_at(&self, now: DateTime<Utc>) -> Result<Vec<Charge>> {
        self.store
            .list_overdue(now, self.config.overdue_threshold)
            .await
    }

    /// Builds the overdue notice sent to the rider.
    pub fn compose_message(&self, charge: &Charge) -> String {
        format!(
            "Caro(a) Ciclista {},\n\n\
             De acordo com nossos registros, identificamos uma cobrança em atraso para a devolução da bicicleta.\n\
             Data da cobrança: {}\n\
             Valor da cobrança: {}\n\n\
             Atenciosamente,\n\
             Equipe do sistema de aluguel de bicicletas",
            charge.rider, charge.requested_at, charge.amount
        )
    }

    /// Sends the overdue notice for `charge`. Notifier errors are returned as is.
    pub async fn notify(&self, charge: &Charge) -> Result<()> {
        let body = self.compose_message(charge);
        let destination = charge.rider.to_string();
        self.notifier
            .send_message(&destination, NOTIFICATION_SUBJECT, &body)
            .await?;
        info!(charge = %charge.id(), rider = %charge.rider, "overdue notice sent");
        Ok(())
    }

    /// Notifies the rider of every overdue charge.
    ///
    /// A failed send is logged and skipped. Returns how many notices went out.
    pub async fn notify_overdue(&self) -> Result<usize> {
        let overdue = self.list_overdue_charges().await?;
        let mut sent = 0;
        for charge in &overdue {
            match self.notify(charge).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(charge = %charge.id(), error = %e, "overdue notice failed"),
            }
        }
        debug!(overdue = overdue.len(), sent, "overdue scan finished");
        Ok(sent)
    }

    /// Puts a charge on the processing queue.
    pub fn enqueue(&self, charge: &Charge) -> Result<()> {
        self.queue
            .send(charge.id())
            .map_err(|_| BillingError::QueueClosed)?;
        debug!(charge = %charge.id(), "charge enqueued");
        Ok(())
    }
}
