//! Event dispatch: lookup, guard and action, then settle.

use super::error::{DispatchError, DispatchOutcome};
use super::event::Event;
use super::machine::Machine;
use crate::core::{GuardedTarget, Model, Target, AUTO_EVENT, INIT_EVENT, INIT_STATE};
use crate::trace::TraceKind;
use serde::de::DeserializeOwned;

type Outcome<M> = Result<DispatchOutcome<<M as Model>::Output>, DispatchError>;

/// The handler chosen for an event: the state owning it and its row.
struct Handler {
    state: String,
    row: usize,
}

impl<M: Model> Machine<M> {
    /// Dispatch one event and settle.
    ///
    /// On error the control state, extended state and history are restored
    /// to what they were before the call.
    pub fn dispatch(&mut self, event: Event<M::EventData>) -> Outcome<M> {
        if event.name.is_empty() {
            return Err(DispatchError::malformed("event name must not be empty"));
        }

        let snapshot = self.runtime.clone();
        self.emit(TraceKind::EventReceived {
            event: event.name.clone(),
            state: self.runtime.control_state.clone(),
        });

        let result = self.process(&event.name, &event.data, 0);
        match &result {
            Ok(outcome) => self.emit(TraceKind::EventSettled {
                event: event.name.clone(),
                state: self.runtime.control_state.clone(),
                transitioned: outcome.is_transitioned(),
            }),
            Err(error) => {
                self.runtime = snapshot;
                self.emit(TraceKind::EventFailed {
                    event: event.name.clone(),
                    state: self.runtime.control_state.clone(),
                    error: error.to_string(),
                });
                tracing::error!(
                    machine_id = %self.id,
                    event = %event.name,
                    state = %self.runtime.control_state,
                    error = %error,
                    "Dispatch failed, machine restored"
                );
            }
        }
        result
    }

    /// Dispatch an event given as a `{ name: data }` JSON envelope.
    pub fn dispatch_value(&mut self, value: serde_json::Value) -> Outcome<M>
    where
        M::EventData: DeserializeOwned,
    {
        let event = Event::from_value(value)?;
        self.dispatch(event)
    }

    /// First state on the lineage of the current state with its own handler.
    fn find_handler(&self, event: &str, external: bool) -> Option<Handler> {
        let current = self.runtime.control_state.as_str();
        if current == INIT_STATE {
            return match event {
                INIT_EVENT => self.indices.initial_rows.first().map(|row| Handler {
                    state: INIT_STATE.to_string(),
                    row: *row,
                }),
                _ => None,
            };
        }
        // Init is only ever raised by the machine itself.
        if external && event == INIT_EVENT {
            return None;
        }

        self.indices.lineage(current).find_map(|state| {
            self.indices.own_handler(state, event).map(|row| Handler {
                state: state.to_string(),
                row,
            })
        })
    }

    /// First guarded target of `row` whose predicate holds.
    fn select_target(
        &self,
        row: usize,
        event: &str,
        data: &M::EventData,
    ) -> Result<Option<GuardedTarget<M>>, DispatchError> {
        for guarded in &self.transitions[row].guards {
            let satisfied = match &guarded.predicate {
                None => true,
                Some(guard) => guard
                    .check(&self.runtime.extended_state, data, &self.settings)
                    .map_err(|source| DispatchError::GuardFailed {
                        guard: guard.name().to_string(),
                        state: self.runtime.control_state.clone(),
                        event: event.to_string(),
                        extended_state: format!("{:?}", self.runtime.extended_state),
                        event_data: format!("{data:?}"),
                        source,
                    })?,
            };
            if satisfied {
                return Ok(Some(guarded.clone()));
            }
        }
        Ok(None)
    }

    fn process(&mut self, event: &str, data: &M::EventData, depth: usize) -> Outcome<M> {
        let origin = self.runtime.control_state.clone();

        let Some(handler) = self.find_handler(event, depth == 0) else {
            tracing::warn!(machine_id = %self.id, state = %origin, event, "No handler for event");
            return Ok(DispatchOutcome::Unhandled {
                state: origin,
                event: event.to_string(),
            });
        };

        let Some(guarded) = self.select_target(handler.row, event, data)? else {
            tracing::warn!(
                machine_id = %self.id,
                state = %origin,
                handler = %handler.state,
                event,
                "No guard satisfied"
            );
            return Ok(DispatchOutcome::NoGuardSatisfied {
                state: origin,
                event: event.to_string(),
            });
        };

        let action = guarded.action.name().to_string();
        let result = guarded
            .action
            .run(&self.runtime.extended_state, data, &self.settings)
            .map_err(|source| DispatchError::ActionFailed {
                action: action.clone(),
                state: origin.clone(),
                event: event.to_string(),
                extended_state: format!("{:?}", self.runtime.extended_state),
                event_data: format!("{data:?}"),
                source,
            })?;
        let extended_state = (self.update_state)(&self.runtime.extended_state, &result.updates)
            .map_err(|source| DispatchError::ReducerFailed {
                action: action.clone(),
                state: origin.clone(),
                event: event.to_string(),
                extended_state: format!("{:?}", self.runtime.extended_state),
                updates: format!("{:?}", result.updates),
                source,
            })?;

        if origin != INIT_STATE {
            let ancestors = self.indices.history_ancestors(&origin);
            self.runtime.history = self.runtime.history.record_exit(&origin, ancestors);
        }

        let target = match &guarded.to {
            Target::State(state) => state.clone(),
            Target::History(history) => self.runtime.history.resolve(history).to_string(),
        };
        if target == INIT_STATE || !self.indices.contains(&target) {
            return Err(DispatchError::UnknownTarget {
                state: origin,
                event: event.to_string(),
                target,
            });
        }

        self.runtime.extended_state = extended_state;
        self.runtime.control_state = target.clone();

        let guard = guarded.predicate.as_ref().map(|g| g.name().to_string());
        tracing::debug!(
            machine_id = %self.id,
            from = %origin,
            event,
            handler = %handler.state,
            guard = ?guard,
            action = %action,
            to = %target,
            depth,
            "Transition taken"
        );
        self.emit(TraceKind::InternalTransition {
            from: origin,
            event: event.to_string(),
            handler: handler.state,
            guard,
            action,
            to: target.clone(),
            depth,
        });

        let mut outputs = result.outputs.unwrap_or_default();
        if let Some(next) = self.cascade_event(&target) {
            if depth >= self.settings.max_cascade_depth {
                return Err(DispatchError::CascadeLimitExceeded {
                    state: target,
                    limit: self.settings.max_cascade_depth,
                });
            }
            if let DispatchOutcome::Transitioned(more) = self.process(next, data, depth + 1)? {
                outputs.extend(more);
            }
        }

        Ok(DispatchOutcome::Transitioned(outputs))
    }

    /// The event raised on entering `state`: its init if compound, otherwise
    /// its eventless transition, if any.
    fn cascade_event(&self, state: &str) -> Option<&'static str> {
        if self.indices.is_compound(state) && self.indices.own_handler(state, INIT_EVENT).is_some() {
            Some(INIT_EVENT)
        } else if self.indices.own_handler(state, AUTO_EVENT).is_some() {
            Some(AUTO_EVENT)
        } else {
            None
        }
    }
}
