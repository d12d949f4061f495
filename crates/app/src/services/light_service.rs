//! Light service: state updates, on/off fades and explicit transitions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lumenhub_domain::color::WHITE;
use lumenhub_domain::command::StateCommand;
use lumenhub_domain::error::{LumenHubError, NotFoundError};
use lumenhub_domain::field::GroupStateField;
use lumenhub_domain::id::{BulbId, TransitionId};
use lumenhub_domain::state::{BulbStatus, GroupState, GroupUpdate};
use lumenhub_domain::transition::{
    PlanKey, Timing, TransitionDefaults, TransitionRequest, TransitionSpec,
};
use lumenhub_domain::units::BRIGHTNESS_MAX;

use crate::ports::GroupStateCoordinator;
use crate::transition_scheduler::TransitionScheduler;

/// Application service for group state and transitions.
///
/// Turning a group off with a transition fades brightness to zero and only
/// flips the status on the final tick. Turning it on with a transition sets
/// `status = ON, brightness = 0` at once and fades up to the requested
/// brightness, or to the brightness it had before it was turned off.
pub struct LightService<C> {
    scheduler: TransitionScheduler<C>,
    defaults: TransitionDefaults,
    brightness_before_off: Mutex<HashMap<BulbId, u8>>,
}

impl<C> LightService<C>
where
    C: GroupStateCoordinator + Send + Sync + 'static,
{
    /// Create a new service on top of `scheduler`.
    pub fn new(scheduler: TransitionScheduler<C>, defaults: TransitionDefaults) -> Self {
        Self {
            scheduler,
            defaults,
            brightness_before_off: Mutex::new(HashMap::new()),
        }
    }

    pub fn scheduler(&self) -> &TransitionScheduler<C> {
        &self.scheduler
    }

    pub fn defaults(&self) -> TransitionDefaults {
        self.defaults
    }

    /// Current state of a group.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::NotFound`] when nothing is known about `bulb`.
    pub async fn get_state(&self, bulb: BulbId) -> Result<GroupState, LumenHubError> {
        self.coordinator().get_state(bulb).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Group",
                id: bulb.to_string(),
            }
            .into()
        })
    }

    /// Apply a state command, immediately or as a set of transitions.
    ///
    /// Returns the group state right after the synchronous part of the
    /// command was applied.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::Validation`] for out-of-range values or invalid
    /// timing, or the coordinator's error when an immediate update fails.
    #[tracing::instrument(skip(self, command), fields(bulb = %bulb))]
    pub async fn update_state(
        &self,
        bulb: BulbId,
        command: StateCommand,
    ) -> Result<GroupState, LumenHubError> {
        let update = command.to_update()?;
        let timing = command
            .timing()
            .map(|hint| hint.resolve(&self.defaults))
            .transpose()?;
        let current = self.coordinator().get_state(bulb).await?.unwrap_or_default();

        if command.status == Some(BulbStatus::Off) {
            self.remember_brightness(bulb, &current);
        }

        match timing {
            None => self.apply_now(bulb, update, current).await,
            Some(timing) => self.transition(bulb, &command, timing, current).await,
        }
    }

    /// Resolve `request` against the group's state and schedule it.
    ///
    /// # Errors
    ///
    /// Returns [`LumenHubError::Validation`] when the request is invalid.
    #[tracing::instrument(skip(self, request), fields(bulb = %bulb))]
    pub async fn create_transition(
        &self,
        bulb: BulbId,
        request: &TransitionRequest,
    ) -> Result<TransitionId, LumenHubError> {
        let state = self.coordinator().get_state(bulb).await?.unwrap_or_default();
        let spec = request.resolve(bulb, &state, &self.defaults)?;
        self.scheduler.create(spec).await
    }

    /// Cancel every transition of a group and forget its state.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's error when forgetting fails.
    #[tracing::instrument(skip(self), fields(bulb = %bulb))]
    pub async fn delete_state(&self, bulb: BulbId) -> Result<(), LumenHubError> {
        self.scheduler.cancel_bulb(bulb).await;
        self.brightness_before_off
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&bulb);
        self.coordinator().forget(bulb).await
    }

    fn coordinator(&self) -> &C {
        self.scheduler.coordinator()
    }

    /// Snap to `update`, cancelling fades that would overwrite it.
    async fn apply_now(
        &self,
        bulb: BulbId,
        update: GroupUpdate,
        current: GroupState,
    ) -> Result<GroupState, LumenHubError> {
        if update.is_empty() {
            return Ok(current);
        }
        self.scheduler.cancel_keys(bulb, &keys_written_by(&update)).await;
        self.coordinator().apply(bulb, update).await
    }

    async fn transition(
        &self,
        bulb: BulbId,
        command: &StateCommand,
        timing: Timing,
        current: GroupState,
    ) -> Result<GroupState, LumenHubError> {
        let mut specs = Vec::new();
        let mut immediate = GroupUpdate::default();

        let brightness_target = command.brightness_target()?;
        let turning_off = self.is_turning_off(bulb);
        match command.status {
            Some(BulbStatus::Off) if current.status != Some(BulbStatus::Off) => {
                match current.brightness.filter(|b| *b > 0) {
                    Some(brightness) => specs.push(
                        TransitionSpec::field(
                            bulb,
                            GroupStateField::Brightness,
                            u16::from(brightness),
                            0,
                            timing,
                        )?
                        .then_apply(GroupUpdate::status(BulbStatus::Off)),
                    ),
                    None => immediate.status = Some(BulbStatus::Off),
                }
            }
            Some(BulbStatus::Off) => {}
            Some(BulbStatus::On) if !current.is_on() || turning_off => {
                immediate = immediate.merge(GroupUpdate {
                    status: Some(BulbStatus::On),
                    brightness: Some(0),
                    ..GroupUpdate::default()
                });
                let end = brightness_target.unwrap_or_else(|| self.brightness_to_restore(bulb, &current));
                specs.push(TransitionSpec::field(
                    bulb,
                    GroupStateField::Brightness,
                    0,
                    end,
                    timing,
                )?);
            }
            Some(BulbStatus::On) | None => {
                if let Some((field, end)) = command
                    .targets()?
                    .into_iter()
                    .find(|(field, _)| field.internal() == GroupStateField::Brightness)
                {
                    let start = current.value_or_default(field);
                    specs.push(TransitionSpec::field(bulb, field, start, end, timing)?);
                }
            }
        }

        for (field, end) in command.targets()? {
            if field.internal() == GroupStateField::Brightness {
                continue;
            }
            let start = current.value_or_default(field);
            specs.push(TransitionSpec::field(bulb, field, start, end, timing)?);
        }
        if let Some(end) = command.color
            && command.hue.is_none()
            && command.saturation.is_none()
        {
            let start = current.color().unwrap_or(WHITE);
            specs.push(TransitionSpec::color(bulb, start, end, timing));
        }

        let mut state = current;
        if !immediate.is_empty() {
            state = self.apply_now(bulb, immediate, current).await?;
        }
        if !specs.is_empty() {
            let ids = self.scheduler.create_batch(specs).await?;
            tracing::debug!(count = ids.len(), "scheduled state transitions");
        }
        Ok(state)
    }

    /// `true` while a fade-out still has to flip the group off.
    fn is_turning_off(&self, bulb: BulbId) -> bool {
        self.scheduler
            .pending_on_finish(bulb, PlanKey::Field(GroupStateField::Brightness))
            .and_then(|update| update.status)
            == Some(BulbStatus::Off)
    }

    fn remember_brightness(&self, bulb: BulbId, current: &GroupState) {
        if let Some(brightness) = current.brightness.filter(|b| *b > 0) {
            self.brightness_before_off
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(bulb, brightness);
        }
    }

    /// Brightness a fade-in ends on when the command names none.
    fn brightness_to_restore(&self, bulb: BulbId, current: &GroupState) -> u16 {
        let remembered = self
            .brightness_before_off
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&bulb)
            .copied();
        remembered
            .or(current.brightness.filter(|b| *b > 0))
            .map_or(BRIGHTNESS_MAX, u16::from)
    }
}

/// Plan slots an immediate update conflicts with.
fn keys_written_by(update: &GroupUpdate) -> Vec<PlanKey> {
    let mut keys = Vec::new();
    let mut add = |key: PlanKey| {
        if !keys.contains(&key) {
            keys.push(key);
        }
    };
    for field in update.fields() {
        match field {
            GroupStateField::Status => add(PlanKey::Field(GroupStateField::Brightness)),
            GroupStateField::Hue | GroupStateField::Saturation => {
                add(PlanKey::Field(field));
                add(PlanKey::Color);
            }
            other => add(PlanKey::Field(other.internal())),
        }
    }
    keys
}
