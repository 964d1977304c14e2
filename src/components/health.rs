use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::signals::Signal;

/// Inspector-style configuration for a [`Health`] tracker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthConfig {
    pub max_health: f32,
    #[serde(default = "default_damage_multiplier")]
    pub damage_multiplier: f32,
    #[serde(default = "default_reset_on_enable")]
    pub reset_on_enable: bool,
    #[serde(default)]
    pub deactivate_on_death: bool,
}

fn default_damage_multiplier() -> f32 {
    1.0
}

fn default_reset_on_enable() -> bool {
    true
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            damage_multiplier: 1.0,
            reset_on_enable: true,
            deactivate_on_death: false,
        }
    }
}

/// Point-in-time health reading handed to notification listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub current: f32,
    pub max: f32,
}

impl Vitals {
    pub fn normalized(&self) -> f32 {
        self.current / self.max
    }
}

/// One subscribe/unsubscribe channel per lifecycle notification.
///
/// The damage channel carries the raw incoming amount, before the
/// multiplier; every other channel carries the tracker's [`Vitals`].
#[derive(Debug, Default)]
pub struct HealthSignals {
    pub damage: Signal<f32>,
    pub death: Signal<Vitals>,
    pub resurrect: Signal<Vitals>,
    pub health_changed: Signal<Vitals>,
    pub destroyed: Signal<Vitals>,
}

/// Damageable-entity tracker: bounded health plus lifecycle notifications.
///
/// All mutation goes through the operations below; each fires its listeners
/// synchronously, in order, on the calling thread. `current` never drops
/// below zero. `set_health` may push it above `max_health`.
#[derive(Component, Debug)]
pub struct Health {
    pub max_health: f32,
    pub damage_multiplier: f32,
    pub reset_on_enable: bool,
    pub deactivate_on_death: bool,
    current: f32,
    signals: HealthSignals,
}

impl From<HealthConfig> for Health {
    fn from(config: HealthConfig) -> Self {
        Self {
            max_health: config.max_health,
            damage_multiplier: config.damage_multiplier,
            reset_on_enable: config.reset_on_enable,
            deactivate_on_death: config.deactivate_on_death,
            current: config.max_health,
            signals: HealthSignals::default(),
        }
    }
}

impl Health {
    pub fn new(max_health: f32) -> Self {
        Self::from(HealthConfig {
            max_health,
            ..HealthConfig::default()
        })
    }

    pub fn health(&self) -> f32 {
        self.current
    }

    pub fn health_normalized(&self) -> f32 {
        self.current / self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    pub fn vitals(&self) -> Vitals {
        Vitals {
            current: self.current,
            max: self.max_health,
        }
    }

    pub fn signals(&self) -> &HealthSignals {
        &self.signals
    }

    /// Subscription surface for the notification channels.
    pub fn signals_mut(&mut self) -> &mut HealthSignals {
        &mut self.signals
    }

    /// Apply incoming damage, scaled by the multiplier and clamped at zero.
    ///
    /// Non-positive amounts are ignored and fire nothing. Otherwise the
    /// damage channel fires with the raw amount, then health-changed, then
    /// death if this call crossed alive to dead. Returns true on that
    /// crossing only; hitting an already-dead tracker still notifies but
    /// returns false.
    pub fn damage(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let was_alive = self.is_alive();
        self.current = (self.current - amount * self.damage_multiplier).max(0.0);
        self.signals.damage.emit(&amount);
        let vitals = self.vitals();
        self.signals.health_changed.emit(&vitals);
        self.death_check(was_alive)
    }

    /// Set health directly.
    ///
    /// A near-zero value on a live tracker delegates to [`Health::kill`]; a
    /// value above epsilon on a dead tracker revives it and fires resurrect
    /// before health-changed. The upper bound is not clamped here.
    pub fn set_health(&mut self, value: f32) {
        if self.is_alive() {
            if value < f32::EPSILON {
                self.kill();
                return;
            }
            self.current = value;
        } else {
            self.current = value.max(0.0);
            if value > f32::EPSILON {
                let vitals = self.vitals();
                self.signals.resurrect.emit(&vitals);
            }
        }
        let vitals = self.vitals();
        self.signals.health_changed.emit(&vitals);
    }

    /// Drop straight to zero health. No-op when already dead.
    pub fn kill(&mut self) {
        if self.is_dead() {
            return;
        }
        self.current = 0.0;
        let vitals = self.vitals();
        self.signals.health_changed.emit(&vitals);
        self.death_check(true);
    }

    pub fn resurrect(&mut self) {
        self.set_health(self.max_health);
    }

    /// Owner teardown hook. Destruction is independent of death; neither
    /// implies or suppresses the other.
    pub fn notify_destroyed(&mut self) {
        let vitals = self.vitals();
        self.signals.destroyed.emit(&vitals);
    }

    fn death_check(&mut self, was_alive: bool) -> bool {
        if was_alive && self.is_dead() {
            let vitals = self.vitals();
            self.signals.death.emit(&vitals);
            return true;
        }
        false
    }
}
