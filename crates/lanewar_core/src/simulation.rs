//! Core simulation loop.
//!
//! [`Simulation`] owns the whole game state: world, entities, economy,
//! wave director, abilities in flight, score and log. A driver calls
//! [`Simulation::update`] once per frame; player actions are methods on
//! the same value. Nothing here touches wall-clock time or global
//! randomness, so two simulations created from the same seed and fed
//! the same calls stay bit-identical.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::abilities::{self, Ability, ScheduledStrike};
use crate::clock::{GameLog, SimClock};
use crate::combat::{self, Kill};
use crate::components::{Body, Entity, EntityId, Faction};
use crate::config::{GameConfig, RulesConfig};
use crate::economy::Economy;
use crate::error::{ActionError, GameError, Result};
use crate::events::{GameOutcome, SoundCue, TickEvents};
use crate::kind::EntityKind;
use crate::math::{Fixed, Vec2Fixed};
use crate::movement::{self, PathStep};
use crate::snapshot::{DropView, EntityView, Hud, Snapshot};
use crate::store::EntityStore;
use crate::supply;
use crate::waves::WaveDirector;
use crate::world::{Lane, World};

/// Outcome of a player action: the events it produced, or why it was refused.
pub type ActionResult = std::result::Result<TickEvents, ActionError>;

/// The core game simulation.
///
/// # Tick Order
///
/// Each [`update`](Self::update) runs, in order:
/// 1. delta clamp and clock advance
/// 2. economy recalculation, passive income, energy regeneration
/// 3. supply drop timers and truck dispatch
/// 4. wave spawning
/// 5. airstrikes whose flight time is over
/// 6. combat and movement for every entity in creation order
/// 7. dead entity purge
/// 8. victory / defeat check and HUD refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    config: GameConfig,
    world: World,
    entities: EntityStore,
    economy: Economy,
    clock: SimClock,
    waves: WaveDirector,
    score: u32,
    log: GameLog,
    rng: ChaCha8Rng,
    paused: bool,
    outcome: Option<GameOutcome>,
    /// Airstrike marker waiting for a target.
    pending_strike: Option<Vec2Fixed>,
    /// Airstrikes in flight, in confirmation order.
    strikes: Vec<ScheduledStrike>,
    hud: Hud,
    /// Events produced since the last update or action returned.
    #[serde(skip)]
    events: TickEvents,
}

impl Simulation {
    /// Create a session with the stock configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use lanewar_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(42);
    /// assert_eq!(sim.hud().resources, 1500);
    /// assert_eq!(sim.entities().len(), 2);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    /// Create a session with a custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let world = World::from_config(&config.world);
        let rules = &config.rules;
        let mut sim = Self {
            world,
            entities: EntityStore::new(),
            economy: Economy::new(rules),
            clock: SimClock::new(),
            waves: WaveDirector::new(),
            score: 0,
            log: GameLog::new(rules.log_capacity),
            rng: ChaCha8Rng::seed_from_u64(seed),
            paused: false,
            outcome: None,
            pending_strike: None,
            strikes: Vec::new(),
            hud: Hud::default(),
            events: TickEvents::default(),
            config,
        };
        sim.reset();
        sim
    }

    /// Start a new campaign.
    ///
    /// Restores the starting economy, clock, wave counter, score and map,
    /// clears the log, drops every entity and any airstrike in flight,
    /// and places one headquarters per faction. The random stream is not
    /// reseeded.
    pub fn reset(&mut self) -> TickEvents {
        let rules = &self.config.rules;
        self.world = World::from_config(&self.config.world);
        self.entities.clear();
        self.economy = Economy::new(rules);
        self.clock = SimClock::new();
        self.waves = WaveDirector::new();
        self.score = 0;
        self.log = GameLog::new(rules.log_capacity);
        self.paused = false;
        self.outcome = None;
        self.pending_strike = None;
        self.strikes.clear();
        self.events = TickEvents::default();

        let player_base = self.world.player_base;
        let enemy_base = self.world.enemy_base;
        self.spawn_structure(EntityKind::Hq, player_base, Faction::Player);
        self.spawn_structure(EntityKind::Hq, enemy_base, Faction::Enemy);

        self.push_log("New campaign started! Build a power plant and a supply center.");
        tracing::info!(entities = self.entities.len(), "Session reset");
        self.finish()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Tuning rules.
    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.config.rules
    }

    /// The map.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// All live entities.
    #[must_use]
    pub const fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Mutable entity access for scenario setup and tooling.
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Player economy.
    #[must_use]
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Simulation time in seconds.
    #[must_use]
    pub const fn now(&self) -> Fixed {
        self.clock.now()
    }

    /// Level of the next wave.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.waves.wave
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Message log, newest first.
    #[must_use]
    pub const fn log(&self) -> &GameLog {
        &self.log
    }

    /// Whether updates are suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the session has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the session ended, if it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Airstrike marker awaiting confirmation.
    #[must_use]
    pub const fn pending_strike(&self) -> Option<Vec2Fixed> {
        self.pending_strike
    }

    /// Airstrikes in flight.
    #[must_use]
    pub fn scheduled_strikes(&self) -> &[ScheduledStrike] {
        &self.strikes
    }

    /// HUD as of the last tick or action.
    #[must_use]
    pub const fn hud(&self) -> &Hud {
        &self.hud
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the simulation by `delta` seconds.
    ///
    /// Does nothing while paused or after the game is over. `delta` is
    /// clamped to `[0, max_delta]`.
    pub fn update(&mut self, delta: Fixed) -> TickEvents {
        if self.paused || self.is_game_over() {
            return std::mem::take(&mut self.events);
        }

        let delta = delta.clamp(Fixed::ZERO, self.config.rules.max_delta);
        self.clock.advance(delta);

        let available = self.economy.recalculate(&self.entities, &self.config.rules);
        let trucks = self.entities.count_kind(EntityKind::Truck);
        self.economy
            .accrue_income(delta, trucks, &self.config.rules);
        self.economy
            .regenerate(delta, available, &self.config.rules);

        self.run_supply_drops(delta);

        if self.waves.is_due(self.clock.now(), &self.config.rules) {
            self.spawn_wave();
        }

        self.run_airstrikes();
        self.run_entities(delta);

        let deaths = self.entities.purge_dead();
        self.events.deaths.extend(deaths);

        self.check_game_over();

        #[cfg(feature = "debug-validation")]
        self.validate();

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(time = %self.clock.label(), state_hash = hash, "Simulation state hash");
        }

        self.finish()
    }

    fn run_supply_drops(&mut self, delta: Fixed) {
        let expired = supply::tick_drops(
            &mut self.world.supply_drops,
            delta,
            &mut self.rng,
            &self.config.rules,
        );
        let home = self.world.player_base;
        for drop in expired {
            if let Some(truck) = supply::dispatch_truck(&mut self.entities, drop, home) {
                tracing::debug!(truck, "Truck dispatched to supply drop");
                self.push_log("Truck dispatched to a supply drop");
            }
        }
    }

    fn spawn_wave(&mut self) {
        let (level, composition) = self.waves.launch(self.clock.now(), &self.config.rules);
        for kind in composition.kinds() {
            let lane = self.random_lane();
            self.enemy_unit(kind, lane);
        }
        tracing::info!(
            wave = level,
            light = composition.light,
            heavy = composition.heavy,
            arty = composition.arty,
            "Wave launched"
        );
        self.push_log(format!("Wave {level}: {} units", composition.total()));
    }

    fn run_airstrikes(&mut self) {
        let now = self.clock.now();
        if !self.strikes.iter().any(|strike| strike.is_due(now)) {
            return;
        }

        let (due, pending): (Vec<_>, Vec<_>) =
            self.strikes.drain(..).partition(|strike| strike.is_due(now));
        self.strikes = pending;

        for strike in due {
            self.push_log("Carpet bombing!");
            let kills = abilities::resolve_strike(&mut self.entities, strike.point, &self.config.rules);
            for kill in kills {
                self.record_kill(kill);
            }
        }
    }

    fn run_entities(&mut self, delta: Fixed) {
        for id in self.entities.ids() {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if !entity.is_alive() {
                continue;
            }

            if entity.kind == EntityKind::Truck {
                self.drive_truck(id, delta);
                continue;
            }

            let target = if combat::can_attack(entity) {
                combat::target_in_range(&self.entities, entity)
            } else {
                None
            };

            match target {
                Some(target) => self.engage(id, target, delta),
                None => self.advance_unit(id, delta),
            }
        }
    }

    /// Count down the attacker's cooldown and fire when it runs out.
    fn engage(&mut self, attacker_id: EntityId, target_id: EntityId, delta: Fixed) {
        let rules = &self.config.rules;
        let now = self.clock.now();
        let (Some(attacker), Some(target)) =
            (self.entities.get(attacker_id), self.entities.get(target_id))
        else {
            return;
        };

        let cooldown = attacker.cooldown - delta;
        let shot = (cooldown <= Fixed::ZERO).then(|| {
            (
                combat::shot_damage(attacker, target, now, rules),
                combat::reload_time(attacker, rules),
            )
        });

        let Some(attacker) = self.entities.get_mut(attacker_id) else {
            return;
        };
        let Some((damage, reload)) = shot else {
            attacker.cooldown = cooldown;
            return;
        };
        attacker.cooldown = reload;

        self.events.cues.push(SoundCue::Hit);
        if let Some(kill) = combat::apply_damage(&mut self.entities, target_id, damage, rules) {
            self.record_kill(kill);
        }
    }

    /// Move a combat unit along its lane. Structures stay put.
    fn advance_unit(&mut self, id: EntityId, delta: Fixed) {
        let radius = self.config.rules.waypoint_radius;
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        let Body::Unit(state) = &mut entity.body else {
            return;
        };
        movement::follow_path(&mut entity.position, state, delta, radius);
    }

    /// Trucks never fight; they loop their route and deliver at its end.
    fn drive_truck(&mut self, id: EntityId, delta: Fixed) {
        let radius = self.config.rules.waypoint_radius;
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.cooldown -= delta;
        let Body::Unit(state) = &mut entity.body else {
            return;
        };
        if movement::follow_path(&mut entity.position, state, delta, radius) != PathStep::ReachedEnd {
            return;
        }

        state.waypoint = 0;
        let gather = state.gather.unwrap_or(Fixed::ZERO);
        self.economy.resources += gather;
        self.score += self.config.rules.delivery_score;
        tracing::debug!(truck = id, %gather, "Truck delivered");
        self.push_log("Truck delivered resources");
    }

    fn record_kill(&mut self, kill: Kill) {
        self.score += kill.score;
        if kill.enemy_hq {
            tracing::info!(score = self.score, "Enemy headquarters destroyed");
            self.push_log("Enemy base destroyed! New waves grow stronger.");
        }
        self.events.kills.push(kill);
    }

    fn check_game_over(&mut self) {
        if self.is_game_over() {
            return;
        }

        let player_hq = self.entities.has_kind(EntityKind::Hq, Faction::Player);
        let enemy_hq = self.entities.has_kind(EntityKind::Hq, Faction::Enemy);

        let outcome = if !player_hq {
            GameOutcome::Defeat
        } else if !enemy_hq {
            GameOutcome::Victory
        } else {
            return;
        };

        self.outcome = Some(outcome);
        self.events.outcome = Some(outcome);
        tracing::info!(?outcome, score = self.score, time = %self.clock.label(), "Game over");
        match outcome {
            GameOutcome::Defeat => self.push_log("Base destroyed. Defeat."),
            GameOutcome::Victory => self.push_log("Victory! You survived every wave."),
        }
    }

    #[cfg(feature = "debug-validation")]
    fn validate(&self) {
        let available = self.economy.available_energy();
        debug_assert!(self.economy.energy >= Fixed::ZERO, "energy went negative");
        debug_assert!(self.economy.energy <= available, "energy above available");
        debug_assert!(
            self.entities.iter().all(Entity::is_alive),
            "dead entity survived the purge"
        );
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Place a structure of `kind` at `position`.
    ///
    /// Player structures other than the headquarters emit a spawn cue.
    /// Returns `None` if `kind` is not a structure.
    pub fn spawn_structure(
        &mut self,
        kind: EntityKind,
        position: Vec2Fixed,
        faction: Faction,
    ) -> Option<EntityId> {
        let id = self.entities.allocate_id();
        let entity = Entity::structure(id, kind, position, faction)?;
        self.entities.insert(entity);
        self.events.spawned.push(id);
        if faction == Faction::Player && kind != EntityKind::Hq {
            self.events.cues.push(SoundCue::Spawn);
        }
        Some(id)
    }

    /// Spawn a freshly trained player unit on a random lane.
    ///
    /// Emits a spawn cue and a "ready for battle" log line. Returns
    /// `None` if `kind` is not trainable.
    pub fn spawn_unit(&mut self, kind: EntityKind) -> Option<EntityId> {
        kind.trainable()?;
        let lane = self.random_lane();
        let spawn = self.world.player_spawn(lane);
        let path = self.world.lane(lane).to_vec();
        let id = self.place_unit(kind, spawn, Faction::Player, Some(path))?;
        self.events.cues.push(SoundCue::Spawn);
        self.push_log(format!("{} ready for battle", kind.label()));
        Some(id)
    }

    /// Spawn an enemy unit at the enemy end of `lane`, walking it backwards.
    pub fn enemy_unit(&mut self, kind: EntityKind, lane: Lane) -> Option<EntityId> {
        let spawn = self.world.enemy_spawn(lane);
        let path = self.world.enemy_path(lane);
        self.place_unit(kind, spawn, Faction::Enemy, Some(path))
    }

    /// Put a unit at an explicit point without cues or log lines.
    ///
    /// Returns `None` if `kind` is not a unit.
    pub fn place_unit(
        &mut self,
        kind: EntityKind,
        position: Vec2Fixed,
        faction: Faction,
        path: Option<Vec<Vec2Fixed>>,
    ) -> Option<EntityId> {
        let id = self.entities.allocate_id();
        let entity = Entity::unit(id, kind, position, faction, path)?;
        self.entities.insert(entity);
        self.events.spawned.push(id);
        Some(id)
    }

    fn random_lane(&mut self) -> Lane {
        Lane::ALL[self.rng.gen_range(0..Lane::ALL.len())]
    }

    /// Uniform draw from `[0, 1)`.
    fn unit_interval(&mut self) -> Fixed {
        Fixed::from_bits(self.rng.gen_range(0..(1_i64 << Fixed::FRAC_NBITS)))
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    /// Build a structure near the player base.
    ///
    /// Kinds outside the build menu are ignored.
    ///
    /// # Errors
    ///
    /// [`ActionError::CannotAffordStructure`] when resources fall short.
    pub fn build(&mut self, kind: EntityKind) -> ActionResult {
        let Some(entry) = kind.buildable() else {
            tracing::debug!(%kind, "Ignoring build of non-buildable kind");
            return Ok(self.finish());
        };
        if !self.economy.spend(entry.cost) {
            return self.refuse(ActionError::CannotAffordStructure);
        }

        let y_offset = (self.unit_interval() - Fixed::from_num(0.5)) * Fixed::from_num(180);
        let x_offset = Fixed::from_num(100) + self.unit_interval() * Fixed::from_num(120);
        let base = self.world.player_base;
        let position = Vec2Fixed::new(
            base.x + x_offset,
            base.y + Fixed::from_num(60) + y_offset,
        );

        self.spawn_structure(kind, position, Faction::Player);
        tracing::debug!(%kind, cost = entry.cost, "Structure built");
        self.push_log(format!("{} built", kind.label()));
        Ok(self.finish())
    }

    /// Train a unit.
    ///
    /// Gates are checked in order: prerequisite structure, resources,
    /// population, energy. Kinds outside the training menu are ignored.
    ///
    /// # Errors
    ///
    /// The first failing gate as an [`ActionError`]; nothing is spent.
    pub fn train(&mut self, kind: EntityKind) -> ActionResult {
        let Some(entry) = kind.trainable() else {
            tracing::debug!(%kind, "Ignoring training of non-trainable kind");
            return Ok(self.finish());
        };
        if !self.entities.has_kind(entry.prerequisite, Faction::Player) {
            return self.refuse(ActionError::MissingPrerequisite);
        }
        if !self.economy.can_afford(entry.cost) {
            return self.refuse(ActionError::CannotAffordUnit);
        }
        if self.economy.pop + entry.pop > self.economy.pop_cap {
            return self.refuse(ActionError::PopulationCapped);
        }
        if self.economy.energy <= Fixed::ZERO {
            return self.refuse(ActionError::NoEnergy);
        }

        self.economy.spend(entry.cost);
        self.economy.pop += entry.pop;
        self.spawn_unit(kind);
        tracing::debug!(%kind, cost = entry.cost, "Unit trained");
        Ok(self.finish())
    }

    /// Activate an ability, paying its energy cost first.
    ///
    /// The airstrike only arms a target marker at the enemy base; see
    /// [`aim_airstrike`](Self::aim_airstrike) and
    /// [`confirm_airstrike`](Self::confirm_airstrike).
    ///
    /// # Errors
    ///
    /// The ability's energy error when stored energy is below its cost.
    pub fn use_ability(&mut self, ability: Ability) -> ActionResult {
        let cost = ability.cost(&self.config.rules);
        if !self.economy.spend_energy(cost) {
            let err = match ability {
                Ability::Airstrike => ActionError::AirstrikeEnergy,
                Ability::Repair => ActionError::RepairEnergy,
                Ability::Boost => ActionError::BoostEnergy,
            };
            return self.refuse(err);
        }

        match ability {
            Ability::Airstrike => {
                self.pending_strike = Some(self.world.enemy_base);
                self.push_log("Select a strike target");
            }
            Ability::Repair => {
                let healed = abilities::apply_repair(&mut self.entities, &self.config.rules);
                tracing::debug!(healed, "Repair applied");
                self.push_log("Engineers restored the defenses");
            }
            Ability::Boost => {
                let boosted =
                    abilities::apply_boost(&mut self.entities, self.clock.now(), &self.config.rules);
                tracing::debug!(boosted, "Boost applied");
                self.push_log("Troops rallied (+50% damage for 5s)");
            }
        }
        Ok(self.finish())
    }

    /// Move the pending airstrike marker.
    ///
    /// Marker moves are silent; nothing is logged either way.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoPendingAirstrike`] if no airstrike is armed.
    pub fn aim_airstrike(&mut self, point: Vec2Fixed) -> std::result::Result<(), ActionError> {
        let marker = self
            .pending_strike
            .as_mut()
            .ok_or(ActionError::NoPendingAirstrike)?;
        *marker = point;
        Ok(())
    }

    /// Confirm the armed airstrike at `point`.
    ///
    /// Clears the marker and schedules impact after the flight delay.
    /// Once confirmed a strike cannot be cancelled.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoPendingAirstrike`] if no airstrike is armed.
    pub fn confirm_airstrike(&mut self, point: Vec2Fixed) -> ActionResult {
        if self.pending_strike.take().is_none() {
            return self.refuse(ActionError::NoPendingAirstrike);
        }
        let fire_at = self.clock.now() + self.config.rules.airstrike.delay;
        self.strikes.push(ScheduledStrike { fire_at, point });
        tracing::debug!(x = %point.x, y = %point.y, %fire_at, "Airstrike scheduled");
        self.push_log("Aircraft en route...");
        Ok(self.finish())
    }

    /// Flip the pause flag. Returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::debug!(paused = self.paused, "Pause toggled");
        self.paused
    }

    /// Build by type identifier. Unknown identifiers return `None`.
    pub fn build_by_id(&mut self, id: &str) -> Option<ActionResult> {
        let kind = parse_or_ignore::<EntityKind>(id)?;
        Some(self.build(kind))
    }

    /// Train by type identifier. Unknown identifiers return `None`.
    pub fn train_by_id(&mut self, id: &str) -> Option<ActionResult> {
        let kind = parse_or_ignore::<EntityKind>(id)?;
        Some(self.train(kind))
    }

    /// Use an ability by identifier. Unknown identifiers return `None`.
    pub fn use_ability_by_id(&mut self, id: &str) -> Option<ActionResult> {
        let ability = parse_or_ignore::<Ability>(id)?;
        Some(self.use_ability(ability))
    }

    /// Overwrite the resource stockpile.
    pub fn set_resources(&mut self, amount: Fixed) {
        self.economy.resources = amount;
        self.refresh_hud();
    }

    /// Overwrite stored energy. The next tick clamps it to the available level.
    pub fn set_energy(&mut self, amount: Fixed) {
        self.economy.energy = amount;
        self.refresh_hud();
    }

    // ------------------------------------------------------------------
    // Views and persistence
    // ------------------------------------------------------------------

    /// Read-only view of the current state for presenters.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entities: self.entities.iter().map(EntityView::from).collect(),
            hud: self.hud.clone(),
            log: self.log.lines().map(str::to_owned).collect(),
            game_over: self.is_game_over(),
            outcome: self.outcome,
            paused: self.paused,
            pending_strike: self.pending_strike.map(Into::into),
            strikes_in_flight: self.strikes.iter().map(|s| s.point.into()).collect(),
            supply_drops: self.world.supply_drops.iter().map(DropView::from).collect(),
        }
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.clock.now().to_bits().hash(&mut hasher);
        self.economy.resources.to_bits().hash(&mut hasher);
        self.economy.energy.to_bits().hash(&mut hasher);
        self.economy.energy_cap.hash(&mut hasher);
        self.economy.pop.hash(&mut hasher);
        self.economy.pop_cap.hash(&mut hasher);
        self.waves.wave.hash(&mut hasher);
        self.waves.last_spawn.to_bits().hash(&mut hasher);
        self.score.hash(&mut hasher);
        self.outcome.hash(&mut hasher);
        self.rng.get_word_pos().hash(&mut hasher);

        self.entities.len().hash(&mut hasher);
        for entity in self.entities.iter() {
            entity.id.hash(&mut hasher);
            entity.kind.hash(&mut hasher);
            entity.faction.hash(&mut hasher);
            entity.position.hash(&mut hasher);
            entity.hp.to_bits().hash(&mut hasher);
            entity.cooldown.to_bits().hash(&mut hasher);
            if let Some(state) = entity.unit_state() {
                state.waypoint.hash(&mut hasher);
                state.path.hash(&mut hasher);
                state.boosted_until.map(Fixed::to_bits).hash(&mut hasher);
            }
        }

        for drop in &self.world.supply_drops {
            drop.timer.to_bits().hash(&mut hasher);
        }
        for strike in &self.strikes {
            strike.fire_at.to_bits().hash(&mut hasher);
            strike.point.hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize the simulation state for save/restore.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize simulation state from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize simulation: {e}")))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn push_log(&mut self, text: impl AsRef<str>) {
        self.log.push(&self.clock, text);
    }

    fn refuse(&mut self, err: ActionError) -> ActionResult {
        tracing::debug!(reason = %err, "Action refused");
        self.push_log(err.to_string());
        self.refresh_hud();
        Err(err)
    }

    fn refresh_hud(&mut self) {
        self.hud = Hud::capture(&self.economy, self.waves.wave, self.score, &self.clock);
    }

    /// Refresh the HUD and hand back the events gathered so far.
    fn finish(&mut self) -> TickEvents {
        self.refresh_hud();
        std::mem::take(&mut self.events)
    }
}

fn parse_or_ignore<T: std::str::FromStr>(id: &str) -> Option<T> {
    let parsed = id.parse().ok();
    if parsed.is_none() {
        tracing::debug!(id, "Ignoring unknown identifier");
    }
    parsed
}
